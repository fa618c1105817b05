use std::time::Duration;

use clap::Args;
use hypnoflow_core::timer::format_countdown_ms;
use hypnoflow_core::{AudioBackend, AudioCoordinator, Config, ExerciseKind, ExerciseSession, NullAudioBackend};
use tokio::time::MissedTickBehavior;

use super::ExerciseArg;
use crate::audio::default_backend;
use crate::output::{ConsoleNotices, ConsolePrinter};

#[derive(Args)]
pub struct RunArgs {
    /// Exercise to run
    #[arg(value_enum)]
    exercise: ExerciseArg,
    /// Stop manually after this many seconds
    #[arg(long)]
    seconds: Option<u64>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// Skip audio even if the exercise has a track
    #[arg(long)]
    no_audio: bool,
}

const BILATERAL_INSTRUCTIONS: [&str; 4] = [
    "Use stereo headphones for the best experience.",
    "Follow the glowing ball with your eyes.",
    "Let yourself be carried by the rhythmic movement.",
    "Tap along to the rhythm.",
];

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let kind = ExerciseKind::from(args.exercise);
    let definition = config.definition_for(kind)?;
    let json = args.json || config.display.json;

    if !json {
        println!("{} - {}", definition.title(), definition.subtitle());
        if kind == ExerciseKind::Bilateral && config.display.show_instructions {
            for (i, line) in BILATERAL_INSTRUCTIONS.iter().enumerate() {
                println!("  {}. {line}", i + 1);
            }
        }
        println!("Press Ctrl-C to go back.");
    }

    let audio_enabled = !args.no_audio && config.audio.enabled;
    let backend: Box<dyn AudioBackend> = if audio_enabled {
        default_backend()
    } else {
        Box::new(NullAudioBackend::default())
    };
    let audio = AudioCoordinator::new(backend).with_volume(config.audio.volume as f32);
    let mut session = ExerciseSession::new(definition, audio, ConsoleNotices, ConsolePrinter::new(json))
        .with_audio_enabled(audio_enabled);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async {
        session.start();
        let period = session.tick_period();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let seconds = args.seconds;
        let manual_stop = async move {
            match seconds {
                Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(manual_stop);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    session.tick(period);
                    if !session.is_active() {
                        break;
                    }
                    if !json {
                        if let Some(ms) = session.engine().countdown_remaining_ms() {
                            println!("  {} remaining", format_countdown_ms(ms));
                        }
                    }
                }
                _ = &mut manual_stop => {
                    session.stop();
                    break;
                }
                _ = &mut ctrl_c => {
                    session.navigate_away();
                    break;
                }
            }
        }
    });
    Ok(())
}
