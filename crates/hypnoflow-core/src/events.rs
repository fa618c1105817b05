use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::animation::AnimationTarget;
use crate::error::AudioError;
use crate::exercise::ExerciseKind;
use crate::timer::RunStatus;

/// Why a run left the `Running` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// User pressed stop.
    Manual,
    /// A bounded exercise reached its total duration.
    Completed,
    /// The host screen was left while the run was active.
    NavigatedAway,
}

/// Every state change in a run produces an Event.
/// Hosts render from them; the animation layer consumes `PhaseEntered`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RunStarted {
        exercise: ExerciseKind,
        at: DateTime<Utc>,
    },
    /// A phase became current. `target` carries the transition durations,
    /// which match the phase length so visuals land as the phase ends.
    PhaseEntered {
        phase_index: usize,
        label: String,
        prompt: String,
        duration_ms: u64,
        target: AnimationTarget,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycle_count: u32,
        at: DateTime<Utc>,
    },
    RunStopped {
        reason: StopReason,
        cycles: u32,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// Visuals return to the idle state.
    AnimationReset {
        target: AnimationTarget,
        at: DateTime<Utc>,
    },
    AudioStarted {
        asset: String,
        at: DateTime<Utc>,
    },
    AudioReleased {
        at: DateTime<Utc>,
    },
    /// Audio could not start; the run continues without it.
    AudioUnavailable {
        error: AudioError,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        exercise: ExerciseKind,
        status: RunStatus,
        phase_index: usize,
        label: String,
        prompt: String,
        remaining_ms: f64,
        display_seconds: u64,
        cycle_count: u32,
        elapsed_ms: f64,
        /// Whole-run countdown, bounded exercises only.
        countdown_ms: Option<u64>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "RunStarted",
            Event::PhaseEntered { .. } => "PhaseEntered",
            Event::CycleCompleted { .. } => "CycleCompleted",
            Event::RunStopped { .. } => "RunStopped",
            Event::AnimationReset { .. } => "AnimationReset",
            Event::AudioStarted { .. } => "AudioStarted",
            Event::AudioReleased { .. } => "AudioReleased",
            Event::AudioUnavailable { .. } => "AudioUnavailable",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}

/// Observer for run events. Injected into a session instead of logging
/// from inside state transitions.
pub trait EventSink {
    fn emit(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn emit(&mut self, event: &Event) {
        self(event)
    }
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::CycleCompleted {
            cycle_count: 3,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CycleCompleted");
        assert_eq!(json["cycle_count"], 3);
        assert_eq!(event.name(), "CycleCompleted");
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = 0;
        {
            let mut sink = |_: &Event| seen += 1;
            sink.emit(&Event::AudioReleased { at: Utc::now() });
            sink.emit(&Event::AudioReleased { at: Utc::now() });
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn stop_reason_is_snake_case() {
        let json = serde_json::to_string(&StopReason::NavigatedAway).unwrap();
        assert_eq!(json, "\"navigated_away\"");
    }
}
