use clap::Args;
use hypnoflow_core::{AudioCoordinator, Config, Event, ExerciseKind, ExerciseSession, Notice, NullAudioBackend};

use super::ExerciseArg;

#[derive(Args)]
pub struct SimulateArgs {
    /// Exercise to simulate
    #[arg(value_enum)]
    exercise: ExerciseArg,
    /// Number of ticks to run, each one tick period long
    #[arg(long, default_value = "100")]
    ticks: u64,
    /// Also print every event produced
    #[arg(long)]
    events: bool,
    /// Stop the run after the last tick
    #[arg(long)]
    stop: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let definition = config.definition_for(ExerciseKind::from(args.exercise))?;
    let mut session: ExerciseSession<NullAudioBackend, Vec<Notice>, Vec<Event>> = ExerciseSession::new(
        definition,
        AudioCoordinator::new(NullAudioBackend::default()),
        Vec::new(),
        Vec::new(),
    );

    session.start();
    let period = session.tick_period();
    for _ in 0..args.ticks {
        if !session.is_active() {
            break;
        }
        session.tick(period);
    }
    if args.stop {
        session.stop();
    }

    if args.events {
        for event in session.sink() {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    println!("{}", serde_json::to_string_pretty(&session.engine().snapshot())?);
    Ok(())
}
