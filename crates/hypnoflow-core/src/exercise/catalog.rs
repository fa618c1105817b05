//! Built-in exercises.
//!
//! Phase tables are the only per-exercise variation point; everything else
//! runs through the shared engine.

use serde::{Deserialize, Serialize};

use super::definition::{ExerciseDefinition, Phase, Rgb, Termination, VisualState};

/// Logical path of the bundled 60-second stereo stimulation track.
pub const BILATERAL_AUDIO_ASSET: &str = "assets/audio/stimulation_bilaterale.mp3";

const TURQUOISE: Rgb = Rgb::new(0x42, 0xE1, 0xE3);
const VIOLET: Rgb = Rgb::new(0x8A, 0x2B, 0xE2);
const BLUE: Rgb = Rgb::new(0x4C, 0x9B, 0xE8);
const ROSE: Rgb = Rgb::new(0xF6, 0xAF, 0xCF);

const BREATHING_TICK_MS: u64 = 100;
const BILATERAL_TICK_MS: u64 = 1000;
const BILATERAL_TOTAL_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Cardiac coherence: 4.5s in, 5.5s out.
    Cardiac,
    /// Square breathing: four equal 4s phases.
    #[serde(rename = "box")]
    BoxBreathing,
    /// Left/right sweep with stereo audio, one minute.
    Bilateral,
}

impl ExerciseKind {
    /// Menu order.
    pub const ALL: [ExerciseKind; 3] = [
        ExerciseKind::Cardiac,
        ExerciseKind::BoxBreathing,
        ExerciseKind::Bilateral,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ExerciseKind::Cardiac => "cardiac",
            ExerciseKind::BoxBreathing => "box",
            ExerciseKind::Bilateral => "bilateral",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// The built-in definition for this exercise.
    pub fn definition(self) -> ExerciseDefinition {
        match self {
            ExerciseKind::Cardiac => cardiac(),
            ExerciseKind::BoxBreathing => box_breathing(),
            ExerciseKind::Bilateral => bilateral(),
        }
    }
}

// The tables below are statically valid; `new` cannot fail on them.
#[allow(clippy::too_many_arguments)]
fn build(
    kind: ExerciseKind,
    title: &str,
    subtitle: &str,
    phases: Vec<Phase>,
    tick_ms: u64,
    termination: Termination,
    idle: VisualState,
    audio_asset: Option<String>,
) -> ExerciseDefinition {
    match ExerciseDefinition::new(kind, title, subtitle, phases, tick_ms, termination, idle, audio_asset) {
        Ok(def) => def,
        Err(e) => unreachable!("built-in exercise '{title}' is invalid: {e}"),
    }
}

fn cardiac() -> ExerciseDefinition {
    build(
        ExerciseKind::Cardiac,
        "Cardiac Coherence",
        "Inhale 4.5s, exhale 5.5s",
        vec![
            Phase::new(
                "inhale",
                "Breathe in",
                4_500,
                VisualState::new(1.2, 1.0).with_color(TURQUOISE),
            ),
            Phase::new(
                "exhale",
                "Breathe out",
                5_500,
                VisualState::new(0.6, 0.4).with_color(VIOLET),
            ),
        ],
        BREATHING_TICK_MS,
        Termination::Looping,
        VisualState::new(0.5, 0.3),
        None,
    )
}

fn box_breathing() -> ExerciseDefinition {
    build(
        ExerciseKind::BoxBreathing,
        "Box Breathing",
        "Inhale, hold, exhale, hold: 4s each",
        vec![
            Phase::new("inhale", "Breathe in", 4_000, VisualState::new(1.2, 1.0).with_color(TURQUOISE)),
            Phase::new("hold1", "Hold", 4_000, VisualState::new(1.2, 1.0).with_color(VIOLET)).held(),
            Phase::new("exhale", "Breathe out", 4_000, VisualState::new(0.5, 1.0).with_color(BLUE)),
            Phase::new("hold2", "Hold", 4_000, VisualState::new(0.5, 1.0).with_color(ROSE)).held(),
        ],
        BREATHING_TICK_MS,
        Termination::Looping,
        VisualState::new(0.5, 1.0).with_color(TURQUOISE),
        None,
    )
}

fn bilateral() -> ExerciseDefinition {
    build(
        ExerciseKind::Bilateral,
        "Bilateral Stimulation",
        "Rhythmic movement with stereo audio, 1 minute",
        vec![
            Phase::new("right", "Follow the light", 1_000, VisualState::new(1.2, 1.0).with_offset(100.0))
                .settling_to(VisualState::new(1.0, 0.3).with_offset(100.0)),
            Phase::new("left", "Follow the light", 1_000, VisualState::new(1.2, 1.0).with_offset(-100.0))
                .settling_to(VisualState::new(1.0, 0.3).with_offset(-100.0)),
        ],
        BILATERAL_TICK_MS,
        Termination::Bounded {
            total_ms: BILATERAL_TOTAL_MS,
        },
        VisualState::new(1.0, 0.3),
        Some(BILATERAL_AUDIO_ASSET.to_string()),
    )
}
