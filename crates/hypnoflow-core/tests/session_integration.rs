//! Integration tests for exercise sessions: exit paths and audio release.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hypnoflow_core::{
    AudioBackend, AudioCoordinator, AudioError, AudioHandle, AudioSessionConfig, Event,
    ExerciseKind, ExerciseSession, Notice, PlaybackOptions, RunStatus, StopReason,
};

#[derive(Debug, Default)]
struct Counters {
    configures: usize,
    loads: usize,
    stops: usize,
    unloads: usize,
}

/// Backend whose counters outlive the session that owns it.
#[derive(Clone, Default)]
struct SharedBackend {
    counters: Rc<RefCell<Counters>>,
    missing: bool,
    misconfigured: bool,
}

impl AudioBackend for SharedBackend {
    fn configure(&mut self, _config: &AudioSessionConfig) -> Result<(), AudioError> {
        self.counters.borrow_mut().configures += 1;
        if self.misconfigured {
            return Err(AudioError::PlaybackConfiguration {
                message: "audio session busy".into(),
            });
        }
        Ok(())
    }

    fn load_and_play(
        &mut self,
        asset: &str,
        _options: &PlaybackOptions,
    ) -> Result<AudioHandle, AudioError> {
        if self.missing {
            return Err(AudioError::MissingAsset {
                asset: asset.into(),
                message: "not bundled".into(),
            });
        }
        let mut c = self.counters.borrow_mut();
        c.loads += 1;
        Ok(AudioHandle::new(c.loads as u64, asset))
    }

    fn stop(&mut self, _handle: &AudioHandle) {
        self.counters.borrow_mut().stops += 1;
    }

    fn unload(&mut self, _handle: AudioHandle) {
        self.counters.borrow_mut().unloads += 1;
    }
}

type Session = ExerciseSession<SharedBackend, Vec<Notice>, Vec<Event>>;

fn bilateral(backend: SharedBackend) -> Session {
    ExerciseSession::new(
        ExerciseKind::Bilateral.definition(),
        AudioCoordinator::new(backend),
        Vec::new(),
        Vec::new(),
    )
}

#[derive(Debug, Clone, Copy)]
enum Exit {
    Manual,
    Timeout,
    NavigateAway,
}

fn apply(session: &mut Session, exit: Exit) {
    match exit {
        Exit::Manual => session.stop(),
        Exit::Timeout => {
            for _ in 0..60 {
                session.tick(Duration::from_secs(1));
            }
        }
        Exit::NavigateAway => session.navigate_away(),
    }
}

#[test]
fn audio_released_once_for_every_exit_order() {
    let exits = [Exit::Manual, Exit::Timeout, Exit::NavigateAway];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let backend = SharedBackend::default();
        let counters = backend.counters.clone();
        {
            let mut session = bilateral(backend);
            session.start();
            for &i in &order {
                apply(&mut session, exits[i]);
            }
            assert_eq!(session.engine().status(), RunStatus::Stopped);
            let stopped = session
                .sink()
                .iter()
                .filter(|e| matches!(e, Event::RunStopped { .. }))
                .count();
            assert_eq!(stopped, 1, "order {order:?}");
        }
        let c = counters.borrow();
        assert_eq!(c.loads, 1, "order {order:?}");
        assert_eq!(c.stops, 1, "order {order:?}");
        assert_eq!(c.unloads, 1, "order {order:?}");
    }
}

#[test]
fn timeout_stops_exactly_once_with_completed_reason() {
    let backend = SharedBackend::default();
    let counters = backend.counters.clone();
    let mut session = bilateral(backend);
    session.start();
    for _ in 0..75 {
        session.tick(Duration::from_secs(1));
    }
    let reasons: Vec<StopReason> = session
        .sink()
        .iter()
        .filter_map(|e| match e {
            Event::RunStopped { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(reasons, vec![StopReason::Completed]);
    assert!(!session.is_active());
    assert_eq!(counters.borrow().unloads, 1);
}

#[test]
fn dropping_an_active_session_releases_audio() {
    let backend = SharedBackend::default();
    let counters = backend.counters.clone();
    {
        let mut session = bilateral(backend);
        session.start();
        session.tick(Duration::from_secs(1));
    }
    let c = counters.borrow();
    assert_eq!(c.stops, 1);
    assert_eq!(c.unloads, 1);
}

#[test]
fn missing_asset_still_runs_the_exercise() {
    let backend = SharedBackend {
        missing: true,
        ..Default::default()
    };
    let counters = backend.counters.clone();
    let mut session = bilateral(backend);
    session.start();

    assert!(session.is_active());
    assert_eq!(session.notices().len(), 1);
    assert!(session.notices()[0].message.contains("stimulation_bilaterale.mp3"));
    assert!(session
        .sink()
        .iter()
        .any(|e| matches!(e, Event::AudioUnavailable { error: AudioError::MissingAsset { .. }, .. })));

    session.tick(Duration::from_secs(1));
    assert_eq!(session.engine().phase_index(), 1);

    session.stop();
    assert_eq!(counters.borrow().stops, 0);
    assert_eq!(session.notices().len(), 1);
}

#[test]
fn configuration_failure_is_one_notice() {
    let backend = SharedBackend {
        misconfigured: true,
        ..Default::default()
    };
    let counters = backend.counters.clone();
    let mut session = bilateral(backend);
    session.start();
    assert!(session.is_active());
    assert_eq!(session.notices().len(), 1);
    assert_eq!(session.notices()[0].title, "Audio unavailable");
    assert_eq!(counters.borrow().loads, 0);
}

#[test]
fn restart_after_stop_reloads_audio() {
    let backend = SharedBackend::default();
    let counters = backend.counters.clone();
    let mut session = bilateral(backend);
    session.start();
    session.stop();
    session.start();
    assert!(session.audio().is_playing());
    session.navigate_away();
    let c = counters.borrow();
    assert_eq!(c.loads, 2);
    assert_eq!(c.unloads, 2);
}

#[test]
fn phase_entered_carries_matching_animation() {
    let mut session: ExerciseSession<SharedBackend, Vec<Notice>, Vec<Event>> = ExerciseSession::new(
        ExerciseKind::BoxBreathing.definition(),
        AudioCoordinator::new(SharedBackend::default()),
        Vec::new(),
        Vec::new(),
    );
    session.start();
    for _ in 0..40 {
        session.tick(Duration::from_millis(100));
    }
    let entered: Vec<(String, u64, u64)> = session
        .sink()
        .iter()
        .filter_map(|e| match e {
            Event::PhaseEntered {
                label,
                duration_ms,
                target,
                ..
            } => Some((label.clone(), *duration_ms, target.move_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(
        entered,
        vec![("inhale".to_string(), 4_000, 4_000), ("hold1".to_string(), 4_000, 0)]
    );
}
