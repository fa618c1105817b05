//! Property tests for the phase engine.

use std::time::Duration;

use hypnoflow_core::{Event, ExerciseKind, PhaseEngine, RunStatus, StopReason};
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = ExerciseKind> {
    prop_oneof![
        Just(ExerciseKind::Cardiac),
        Just(ExerciseKind::BoxBreathing),
        Just(ExerciseKind::Bilateral),
    ]
}

fn looping_kind() -> impl Strategy<Value = ExerciseKind> {
    prop_oneof![Just(ExerciseKind::Cardiac), Just(ExerciseKind::BoxBreathing)]
}

proptest! {
    #[test]
    fn start_loads_first_phase_duration(kind in kind()) {
        let mut engine = PhaseEngine::new(kind.definition());
        engine.start();
        let first = engine.definition().phases()[0].duration_ms as f64;
        prop_assert_eq!(engine.remaining_ms(), first);
        prop_assert_eq!(engine.phase_index(), 0);
        prop_assert!(engine.is_active());
    }

    #[test]
    fn exact_phase_of_ticks_moves_one_phase(kind in looping_kind(), phase in 0usize..4) {
        let mut engine = PhaseEngine::new(kind.definition());
        engine.start();
        let len = engine.definition().phases().len();
        let phase = phase % len;
        // Walk to `phase` one whole phase at a time.
        for _ in 0..phase {
            let ms = engine.current_phase().duration_ms;
            engine.tick(Duration::from_millis(ms));
        }
        prop_assert_eq!(engine.phase_index(), phase);

        let ticks = engine.current_phase().duration_ms / 100;
        let mut entered = 0;
        for _ in 0..ticks {
            entered += engine
                .tick(Duration::from_millis(100))
                .iter()
                .filter(|e| matches!(e, Event::PhaseEntered { .. }))
                .count();
        }
        let next = (phase + 1) % len;
        prop_assert_eq!(entered, 1);
        prop_assert_eq!(engine.phase_index(), next);
        prop_assert_eq!(
            engine.remaining_ms(),
            engine.definition().phases()[next].duration_ms as f64
        );
    }

    #[test]
    fn looping_exercises_never_stop(kind in looping_kind(), ticks in 1usize..2_000) {
        let mut engine = PhaseEngine::new(kind.definition());
        engine.start();
        let mut wraps = 0u32;
        for _ in 0..ticks {
            for event in engine.tick(Duration::from_millis(100)) {
                match event {
                    Event::CycleCompleted { cycle_count, .. } => {
                        wraps += 1;
                        prop_assert_eq!(cycle_count, wraps);
                    }
                    Event::RunStopped { .. } => prop_assert!(false, "looping run stopped"),
                    _ => {}
                }
            }
        }
        prop_assert!(engine.is_active());
        prop_assert_eq!(engine.cycle_count(), wraps);
    }

    #[test]
    fn bilateral_stops_once_at_sixty_seconds(ticks in 60usize..200) {
        let mut engine = PhaseEngine::new(ExerciseKind::Bilateral.definition());
        engine.start();
        let mut stops = 0;
        let mut stopped_at = None;
        for i in 1..=ticks {
            for event in engine.tick(Duration::from_secs(1)) {
                if let Event::RunStopped { reason, .. } = event {
                    prop_assert_eq!(reason, StopReason::Completed);
                    stops += 1;
                    stopped_at = Some(i);
                }
            }
        }
        prop_assert_eq!(stops, 1);
        prop_assert_eq!(stopped_at, Some(60));
        prop_assert_eq!(engine.status(), RunStatus::Stopped);
    }

    #[test]
    fn stop_is_idempotent(kind in kind(), ticks in 0usize..100, extra_stops in 1usize..5) {
        let mut engine = PhaseEngine::new(kind.definition());
        engine.start();
        for _ in 0..ticks {
            engine.tick(engine.tick_period());
        }
        engine.stop(StopReason::Manual);
        for _ in 0..extra_stops {
            prop_assert!(engine.stop(StopReason::Manual).is_empty());
            prop_assert!(engine.tick(engine.tick_period()).is_empty());
        }
        prop_assert!(!engine.is_active());
        prop_assert_eq!(engine.phase_index(), 0);
    }
}
