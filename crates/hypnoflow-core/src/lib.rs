//! # HypnoFlow Core Library
//!
//! Exercise engine behind the HypnoFlow relaxation screens: cardiac
//! coherence breathing, box breathing and bilateral stimulation.
//!
//! ## Architecture
//!
//! - **Exercises**: static phase tables, the only per-exercise variation point
//! - **Timer Engine**: a tick-driven state machine; the caller invokes `tick()`
//!   at the exercise's tick period
//! - **Animation**: pure mapping from phase to visual target and transition
//!   durations, delivered through `PhaseEntered` events
//! - **Audio**: session setup, playback and exactly-once release around a
//!   platform backend, degrading to a notice when audio is unavailable
//! - **Session**: ties the above together behind start / tick / stop /
//!   navigate-away
//!
//! ## Key Components
//!
//! - [`PhaseEngine`]: Core timer state machine
//! - [`ExerciseSession`]: Screen-lifetime orchestration
//! - [`AudioCoordinator`]: Audio handle ownership
//! - [`Config`]: Application configuration management

pub mod animation;
pub mod audio;
pub mod error;
pub mod events;
pub mod exercise;
pub mod session;
pub mod storage;
pub mod timer;

pub use animation::{AnimationTarget, Interpolator, Keyframe};
pub use audio::{
    AudioBackend, AudioCoordinator, AudioHandle, AudioSessionConfig, NoticeSink, Notice,
    NullAudioBackend, PlaybackOptions,
};
pub use error::{AudioError, ConfigError, CoreError, ValidationError};
pub use events::{Event, EventSink, NullSink, StopReason};
pub use exercise::{ExerciseDefinition, ExerciseKind, Phase, Rgb, Termination, VisualState};
pub use session::ExerciseSession;
pub use storage::Config;
pub use timer::{PhaseEngine, RunState, RunStatus};
