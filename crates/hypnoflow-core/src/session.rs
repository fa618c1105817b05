//! One exercise screen's worth of state.
//!
//! An `ExerciseSession` ties the phase engine to the audio coordinator and
//! the host's notice and event sinks. Manual stop, countdown expiry and
//! navigating away all converge on the same teardown, so a started audio
//! handle is released exactly once whichever comes first.

use std::time::Duration;

use chrono::Utc;

use crate::audio::{AudioBackend, AudioCoordinator, Notice, NoticeSink};
use crate::events::{Event, EventSink, StopReason};
use crate::exercise::ExerciseDefinition;
use crate::timer::PhaseEngine;

pub struct ExerciseSession<B, N, S>
where
    B: AudioBackend,
    N: NoticeSink,
    S: EventSink,
{
    engine: PhaseEngine,
    audio: AudioCoordinator<B>,
    audio_enabled: bool,
    notices: N,
    sink: S,
}

impl<B, N, S> ExerciseSession<B, N, S>
where
    B: AudioBackend,
    N: NoticeSink,
    S: EventSink,
{
    pub fn new(definition: ExerciseDefinition, audio: AudioCoordinator<B>, notices: N, sink: S) -> Self {
        Self {
            engine: PhaseEngine::new(definition),
            audio,
            audio_enabled: true,
            notices,
            sink,
        }
    }

    /// Skip audio even when the exercise has a track.
    pub fn with_audio_enabled(mut self, enabled: bool) -> Self {
        self.audio_enabled = enabled;
        self
    }

    pub fn engine(&self) -> &PhaseEngine {
        &self.engine
    }

    pub fn audio(&self) -> &AudioCoordinator<B> {
        &self.audio
    }

    pub fn notices(&self) -> &N {
        &self.notices
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn tick_period(&self) -> Duration {
        self.engine.tick_period()
    }

    /// Start the run, then try to start audio. Audio failure produces one
    /// notice and leaves the run going.
    pub fn start(&mut self) {
        let events = self.engine.start();
        if events.is_empty() {
            return;
        }
        self.publish(&events);

        let asset = match (self.audio_enabled, self.engine.definition().audio_asset()) {
            (true, Some(asset)) => asset.to_string(),
            _ => return,
        };
        match self.audio.start_audio(&asset) {
            Ok(()) => self.sink.emit(&Event::AudioStarted {
                asset,
                at: Utc::now(),
            }),
            Err(error) => {
                self.notices.notify(&Notice::from_audio_error(&error));
                self.sink.emit(&Event::AudioUnavailable {
                    error,
                    at: Utc::now(),
                });
            }
        }
    }

    /// Advance by `delta`. Releases audio if this tick ended the run.
    pub fn tick(&mut self, delta: Duration) {
        let events = self.engine.tick(delta);
        self.publish(&events);
        if !self.engine.is_active() {
            self.release_audio();
        }
    }

    /// User pressed stop. Idempotent.
    pub fn stop(&mut self) {
        self.shutdown(StopReason::Manual);
    }

    /// Host screen is going away. Valid in any state.
    pub fn navigate_away(&mut self) {
        self.shutdown(StopReason::NavigatedAway);
    }

    fn shutdown(&mut self, reason: StopReason) {
        let events = self.engine.stop(reason);
        self.publish(&events);
        self.release_audio();
    }

    fn release_audio(&mut self) {
        if self.audio.stop_audio() {
            self.sink.emit(&Event::AudioReleased { at: Utc::now() });
        }
    }

    fn publish(&mut self, events: &[Event]) {
        for event in events {
            self.sink.emit(event);
        }
    }
}

impl<B, N, S> Drop for ExerciseSession<B, N, S>
where
    B: AudioBackend,
    N: NoticeSink,
    S: EventSink,
{
    fn drop(&mut self) {
        if self.engine.is_active() || self.audio.is_playing() {
            tracing::debug!("session dropped while running");
            self.navigate_away();
        }
    }
}
