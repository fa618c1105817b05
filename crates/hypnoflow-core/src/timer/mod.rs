mod display;
mod engine;

pub use display::{format_clock, format_countdown_ms};
pub use engine::{PhaseEngine, RunState, RunStatus};
