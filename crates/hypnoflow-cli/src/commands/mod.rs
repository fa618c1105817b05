pub mod config;
pub mod menu;
pub mod run;
pub mod simulate;

use clap::ValueEnum;
use hypnoflow_core::ExerciseKind;

/// Exercise selector shared by `run` and `simulate`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExerciseArg {
    /// Cardiac coherence breathing
    Cardiac,
    /// Box (square) breathing
    #[value(alias = "square")]
    Box,
    /// Bilateral stimulation
    Bilateral,
}

impl From<ExerciseArg> for ExerciseKind {
    fn from(arg: ExerciseArg) -> Self {
        match arg {
            ExerciseArg::Cardiac => ExerciseKind::Cardiac,
            ExerciseArg::Box => ExerciseKind::BoxBreathing,
            ExerciseArg::Bilateral => ExerciseKind::Bilateral,
        }
    }
}
