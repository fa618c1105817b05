//! Phase timer engine.
//!
//! A tick-driven state machine shared by every exercise. It does not own a
//! timer thread; the host calls `tick()` once per `tick_period()` with the
//! time that actually elapsed.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Stopped
//!            ^          |
//!            +-- start -+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PhaseEngine::new(ExerciseKind::BoxBreathing.definition());
//! engine.start();
//! // Every engine.tick_period():
//! for event in engine.tick(elapsed) { /* render */ }
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::animation;
use crate::events::{Event, StopReason};
use crate::exercise::{ExerciseDefinition, Phase, Termination};

/// Remaining time within this many milliseconds of zero counts as expired.
const EXPIRY_EPSILON_MS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    /// Reached by manual stop, countdown expiry or navigating away.
    /// Only a fresh `start` leaves it.
    Stopped,
}

/// Mutable state of one exercise run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunState {
    pub status: RunStatus,
    pub phase_index: usize,
    /// Milliseconds left in the current phase.
    pub remaining_ms: f64,
    /// Completed passes through the phase list.
    pub cycle_count: u32,
    /// Milliseconds since `start`, across phases.
    pub elapsed_ms: f64,
}

impl RunState {
    fn initial(definition: &ExerciseDefinition) -> Self {
        Self {
            status: RunStatus::Idle,
            phase_index: 0,
            remaining_ms: definition.phase(0).duration_ms as f64,
            cycle_count: 0,
            elapsed_ms: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Running
    }
}

/// Drives an exercise's phases from external ticks.
#[derive(Debug, Clone)]
pub struct PhaseEngine {
    definition: ExerciseDefinition,
    state: RunState,
}

impl PhaseEngine {
    /// Starts `Idle` with phase 0 ready.
    pub fn new(definition: ExerciseDefinition) -> Self {
        let state = RunState::initial(&definition);
        Self { definition, state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn definition(&self) -> &ExerciseDefinition {
        &self.definition
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn phase_index(&self) -> usize {
        self.state.phase_index
    }

    pub fn current_phase(&self) -> &Phase {
        self.definition.phase(self.state.phase_index)
    }

    pub fn remaining_ms(&self) -> f64 {
        self.state.remaining_ms
    }

    pub fn remaining_secs(&self) -> f64 {
        self.state.remaining_ms / 1000.0
    }

    /// Whole seconds shown on screen: 3.2s left displays as 4.
    pub fn display_seconds(&self) -> u64 {
        (self.state.remaining_ms.max(0.0) / 1000.0).ceil() as u64
    }

    pub fn cycle_count(&self) -> u32 {
        self.state.cycle_count
    }

    /// Whole-run time left for bounded exercises; `None` when looping.
    pub fn countdown_remaining_ms(&self) -> Option<u64> {
        match self.definition.termination() {
            Termination::Bounded { total_ms } => {
                Some((total_ms as f64 - self.state.elapsed_ms).max(0.0).round() as u64)
            }
            Termination::Looping => None,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.current_phase().duration_ms as f64;
        (1.0 - self.state.remaining_ms / total).clamp(0.0, 1.0)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.definition.tick_ms())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let phase = self.current_phase();
        Event::StateSnapshot {
            exercise: self.definition.kind(),
            status: self.state.status,
            phase_index: self.state.phase_index,
            label: phase.label.clone(),
            prompt: phase.prompt.clone(),
            remaining_ms: self.state.remaining_ms,
            display_seconds: self.display_seconds(),
            cycle_count: self.state.cycle_count,
            elapsed_ms: self.state.elapsed_ms,
            countdown_ms: self.countdown_remaining_ms(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run at phase 0. No-op while already running.
    pub fn start(&mut self) -> Vec<Event> {
        if self.state.is_active() {
            return Vec::new();
        }
        self.state = RunState {
            status: RunStatus::Running,
            ..RunState::initial(&self.definition)
        };
        tracing::info!(exercise = self.definition.kind().slug(), "run started");
        vec![
            Event::RunStarted {
                exercise: self.definition.kind(),
                at: Utc::now(),
            },
            self.phase_entered(),
        ]
    }

    /// Account for `delta` of elapsed time. No-op unless running.
    ///
    /// At most one phase boundary is crossed per call, and the new phase
    /// starts with its full duration; overshoot is not carried over.
    pub fn tick(&mut self, delta: Duration) -> Vec<Event> {
        if !self.state.is_active() {
            return Vec::new();
        }
        let delta_ms = delta.as_nanos() as f64 / 1_000_000.0;
        self.state.remaining_ms -= delta_ms;
        self.state.elapsed_ms += delta_ms;

        if let Termination::Bounded { total_ms } = self.definition.termination() {
            if self.state.elapsed_ms >= total_ms as f64 - EXPIRY_EPSILON_MS {
                return self.stop(StopReason::Completed);
            }
        }

        if self.state.remaining_ms > EXPIRY_EPSILON_MS {
            return Vec::new();
        }
        self.advance()
    }

    /// End the run and return to the initial phase. Idempotent.
    pub fn stop(&mut self, reason: StopReason) -> Vec<Event> {
        if !self.state.is_active() {
            return Vec::new();
        }
        let cycles = self.state.cycle_count;
        let elapsed_ms = self.state.elapsed_ms.max(0.0).round() as u64;
        self.state = RunState {
            status: RunStatus::Stopped,
            cycle_count: cycles,
            ..RunState::initial(&self.definition)
        };
        tracing::info!(
            exercise = self.definition.kind().slug(),
            ?reason,
            cycles,
            elapsed_ms,
            "run stopped"
        );
        vec![
            Event::RunStopped {
                reason,
                cycles,
                elapsed_ms,
                at: Utc::now(),
            },
            Event::AnimationReset {
                target: animation::idle_target(&self.definition),
                at: Utc::now(),
            },
        ]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) -> Vec<Event> {
        let mut events = Vec::with_capacity(2);
        let next = (self.state.phase_index + 1) % self.definition.phases().len();
        if next == 0 {
            self.state.cycle_count += 1;
            events.push(Event::CycleCompleted {
                cycle_count: self.state.cycle_count,
                at: Utc::now(),
            });
        }
        self.state.phase_index = next;
        self.state.remaining_ms = self.definition.phase(next).duration_ms as f64;
        events.push(self.phase_entered());
        events
    }

    fn phase_entered(&self) -> Event {
        let index = self.state.phase_index;
        let phase = self.definition.phase(index);
        tracing::debug!(phase = %phase.label, index, duration_ms = phase.duration_ms, "phase entered");
        Event::PhaseEntered {
            phase_index: index,
            label: phase.label.clone(),
            prompt: phase.prompt.clone(),
            duration_ms: phase.duration_ms,
            target: animation::target_for(&self.definition, index),
            at: Utc::now(),
        }
    }
}
