mod catalog;
mod definition;

pub use catalog::{ExerciseKind, BILATERAL_AUDIO_ASSET};
pub use definition::{ExerciseDefinition, Phase, Rgb, Termination, VisualState};
