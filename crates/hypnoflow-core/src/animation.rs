//! Animation driver.
//!
//! Maps a phase to the visual target the presentation layer should move
//! towards, with one transition duration per channel. The driver is pure:
//! nothing here feeds back into timer state.

use serde::{Deserialize, Serialize};

use crate::exercise::{ExerciseDefinition, ExerciseKind, VisualState};

/// Transition length used when a run returns to idle.
pub const RESET_TRANSITION_MS: u64 = 500;

/// Box breathing swaps colors quickly instead of over the whole phase.
const BOX_COLOR_TRANSITION_MS: u64 = 500;

/// Second leg of a pulse phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub visual: VisualState,
    pub duration_ms: u64,
}

/// What to animate towards and how long each channel takes to get there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationTarget {
    pub visual: VisualState,
    /// Scale and horizontal offset.
    pub move_ms: u64,
    /// Opacity.
    pub fade_ms: u64,
    pub color_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle: Option<Keyframe>,
}

impl AnimationTarget {
    /// Time until every channel has reached its final value.
    pub fn total_ms(&self) -> u64 {
        let first = self.move_ms.max(self.fade_ms).max(self.color_ms);
        match self.settle {
            Some(k) => self.move_ms.max(self.fade_ms) + k.duration_ms,
            None => first,
        }
    }
}

/// Target for the phase at `phase_index`.
pub fn target_for(definition: &ExerciseDefinition, phase_index: usize) -> AnimationTarget {
    let phase = definition.phase(phase_index);
    let duration = phase.duration_ms;

    let color_ms = match definition.kind() {
        ExerciseKind::BoxBreathing => BOX_COLOR_TRANSITION_MS,
        _ => duration,
    };

    if let Some(settle) = phase.settle {
        let lead = duration / 2;
        return AnimationTarget {
            visual: phase.target,
            move_ms: lead,
            fade_ms: lead,
            color_ms: lead,
            settle: Some(Keyframe {
                visual: settle,
                duration_ms: duration - lead,
            }),
        };
    }

    AnimationTarget {
        visual: phase.target,
        move_ms: if phase.hold { 0 } else { duration },
        fade_ms: duration,
        color_ms,
        settle: None,
    }
}

/// Target for returning to the canonical idle look.
pub fn idle_target(definition: &ExerciseDefinition) -> AnimationTarget {
    AnimationTarget {
        visual: definition.idle(),
        move_ms: RESET_TRANSITION_MS,
        fade_ms: RESET_TRANSITION_MS,
        color_ms: RESET_TRANSITION_MS,
        settle: None,
    }
}

/// Linear interpolation of a running transition.
///
/// The presentation layer normally owns this; it lives here so hosts
/// without an animation scheduler (the CLI, tests) can sample a frame.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator {
    from: VisualState,
    target: AnimationTarget,
}

impl Interpolator {
    pub fn new(from: VisualState, target: AnimationTarget) -> Self {
        Self { from, target }
    }

    /// Visual state `elapsed_ms` after the transition began.
    pub fn sample(&self, elapsed_ms: u64) -> VisualState {
        let t = &self.target;
        let lead = t.move_ms.max(t.fade_ms);
        match t.settle {
            Some(k) if elapsed_ms > lead => {
                let first = Interpolator::new(self.from, AnimationTarget { settle: None, ..*t });
                let reached = first.sample(lead);
                let second = AnimationTarget {
                    visual: k.visual,
                    move_ms: k.duration_ms,
                    fade_ms: k.duration_ms,
                    color_ms: k.duration_ms,
                    settle: None,
                };
                Interpolator::new(reached, second).sample(elapsed_ms - lead)
            }
            _ => {
                let moved = progress(elapsed_ms, t.move_ms);
                let faded = progress(elapsed_ms, t.fade_ms);
                let colored = progress(elapsed_ms, t.color_ms);
                VisualState {
                    scale: lerp(self.from.scale, t.visual.scale, moved),
                    opacity: lerp(self.from.opacity, t.visual.opacity, faded),
                    offset_x: lerp(self.from.offset_x, t.visual.offset_x, moved),
                    color: match (self.from.color, t.visual.color) {
                        (Some(a), Some(b)) => Some(a.lerp(b, colored)),
                        (None, b) => b,
                        (a, None) => a,
                    },
                }
            }
        }
    }
}

fn progress(elapsed_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f64 / duration_ms as f64).min(1.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t >= 1.0 {
        return b;
    }
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breathing_transitions_span_the_phase() {
        let def = ExerciseKind::Cardiac.definition();
        let inhale = target_for(&def, 0);
        assert_eq!(inhale.move_ms, 4_500);
        assert_eq!(inhale.fade_ms, 4_500);
        assert_eq!(inhale.visual.scale, 1.2);
        let exhale = target_for(&def, 1);
        assert_eq!(exhale.move_ms, 5_500);
        assert_eq!(exhale.visual.opacity, 0.4);
    }

    #[test]
    fn box_holds_do_not_move() {
        let def = ExerciseKind::BoxBreathing.definition();
        let hold = target_for(&def, 1);
        assert_eq!(hold.move_ms, 0);
        assert_eq!(hold.color_ms, 500);
        let inhale = target_for(&def, 0);
        assert_eq!(inhale.move_ms, 4_000);
    }

    #[test]
    fn bilateral_pulses_then_settles() {
        let def = ExerciseKind::Bilateral.definition();
        let right = target_for(&def, 0);
        assert_eq!(right.move_ms, 500);
        let settle = right.settle.unwrap();
        assert_eq!(settle.duration_ms, 500);
        assert_eq!(settle.visual.opacity, 0.3);
        assert_eq!(right.total_ms(), 1_000);
    }

    #[test]
    fn idle_uses_short_reset() {
        let def = ExerciseKind::Cardiac.definition();
        let idle = idle_target(&def);
        assert_eq!(idle.visual, def.idle());
        assert_eq!(idle.total_ms(), RESET_TRANSITION_MS);
    }

    #[test]
    fn interpolator_hits_target_at_phase_end() {
        let def = ExerciseKind::Cardiac.definition();
        let target = target_for(&def, 0);
        let interp = Interpolator::new(def.idle(), target);
        let start = interp.sample(0);
        assert_eq!(start.scale, 0.5);
        let mid = interp.sample(2_250);
        assert!((mid.scale - 0.85).abs() < 1e-9);
        assert_eq!(interp.sample(4_500).scale, 1.2);
        assert_eq!(interp.sample(9_000).scale, 1.2);
    }

    #[test]
    fn zero_duration_snaps() {
        let def = ExerciseKind::BoxBreathing.definition();
        let interp = Interpolator::new(VisualState::new(0.5, 1.0), target_for(&def, 1));
        assert_eq!(interp.sample(0).scale, 1.2);
    }

    #[test]
    fn pulse_returns_to_settle_state() {
        let def = ExerciseKind::Bilateral.definition();
        let interp = Interpolator::new(def.idle(), target_for(&def, 0));
        let peak = interp.sample(500);
        assert_eq!(peak.offset_x, 100.0);
        assert_eq!(peak.opacity, 1.0);
        let end = interp.sample(1_000);
        assert_eq!(end.offset_x, 100.0);
        assert_eq!(end.opacity, 0.3);
        assert_eq!(end.scale, 1.0);
    }
}
