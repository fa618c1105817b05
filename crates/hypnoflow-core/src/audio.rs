//! Audio coordination for exercises with a soundtrack.
//!
//! Playback itself belongs to the platform. This module owns the policy
//! around it: configure the session, load and play once, report failures as
//! a dismissable notice instead of aborting, and release the handle exactly
//! once.

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Platform audio-session settings applied before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSessionConfig {
    /// Keep playing with the ringer muted.
    pub plays_in_silent_mode: bool,
    pub stays_active_in_background: bool,
    /// Lower other apps' audio instead of stopping it.
    pub duck_others: bool,
    pub play_through_earpiece: bool,
}

impl Default for AudioSessionConfig {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
            stays_active_in_background: false,
            duck_others: true,
            play_through_earpiece: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackOptions {
    pub autoplay: bool,
    /// The bilateral track is exactly one run long.
    pub looping: bool,
    /// 0.0 ..= 1.0
    pub volume: f32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            looping: false,
            volume: 1.0,
        }
    }
}

/// Opaque handle to a loaded, playing sound. Not `Clone`: the run that
/// started it is its only owner.
#[derive(Debug, PartialEq, Eq)]
pub struct AudioHandle {
    id: u64,
    asset: String,
}

impl AudioHandle {
    /// For backends minting their own handles.
    pub fn new(id: u64, asset: impl Into<String>) -> Self {
        Self {
            id,
            asset: asset.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }
}

/// Platform playback API.
pub trait AudioBackend {
    fn configure(&mut self, config: &AudioSessionConfig) -> Result<(), AudioError>;

    fn load_and_play(
        &mut self,
        asset: &str,
        options: &PlaybackOptions,
    ) -> Result<AudioHandle, AudioError>;

    fn stop(&mut self, handle: &AudioHandle);

    /// Frees the underlying resource. Always preceded by `stop`.
    fn unload(&mut self, handle: AudioHandle);
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn configure(&mut self, config: &AudioSessionConfig) -> Result<(), AudioError> {
        (**self).configure(config)
    }

    fn load_and_play(
        &mut self,
        asset: &str,
        options: &PlaybackOptions,
    ) -> Result<AudioHandle, AudioError> {
        (**self).load_and_play(asset, options)
    }

    fn stop(&mut self, handle: &AudioHandle) {
        (**self).stop(handle)
    }

    fn unload(&mut self, handle: AudioHandle) {
        (**self).unload(handle)
    }
}

/// Backend that accepts every request and plays nothing.
#[derive(Debug, Default)]
pub struct NullAudioBackend {
    next_id: u64,
}

impl AudioBackend for NullAudioBackend {
    fn configure(&mut self, _config: &AudioSessionConfig) -> Result<(), AudioError> {
        Ok(())
    }

    fn load_and_play(
        &mut self,
        asset: &str,
        _options: &PlaybackOptions,
    ) -> Result<AudioHandle, AudioError> {
        self.next_id += 1;
        Ok(AudioHandle::new(self.next_id, asset))
    }

    fn stop(&mut self, _handle: &AudioHandle) {}

    fn unload(&mut self, _handle: AudioHandle) {}
}

/// A dismissable, informational message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn from_audio_error(error: &AudioError) -> Self {
        match error {
            AudioError::MissingAsset { asset, .. } => Self {
                title: "Audio file missing".into(),
                message: format!(
                    "The bilateral stimulation track must be placed at {asset}. \
                     The exercise continues without sound."
                ),
            },
            AudioError::PlaybackConfiguration { .. } => Self {
                title: "Audio unavailable".into(),
                message: "Audio could not be configured. The exercise continues without sound."
                    .into(),
            },
        }
    }
}

/// Where notices are shown.
pub trait NoticeSink {
    fn notify(&mut self, notice: &Notice);
}

impl<F> NoticeSink for F
where
    F: FnMut(&Notice),
{
    fn notify(&mut self, notice: &Notice) {
        self(notice)
    }
}

impl NoticeSink for Vec<Notice> {
    fn notify(&mut self, notice: &Notice) {
        self.push(notice.clone());
    }
}

/// Owns at most one playing handle on behalf of a run.
#[derive(Debug)]
pub struct AudioCoordinator<B> {
    backend: B,
    session: AudioSessionConfig,
    options: PlaybackOptions,
    handle: Option<AudioHandle>,
}

impl<B: AudioBackend> AudioCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: AudioSessionConfig::default(),
            options: PlaybackOptions::default(),
            handle: None,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.options.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn is_playing(&self) -> bool {
        self.handle.is_some()
    }

    /// Configure the session, then load and play `asset`.
    ///
    /// Failures are returned for the caller to turn into a notice; they are
    /// never retried. A handle still held from an earlier start is released
    /// first.
    pub fn start_audio(&mut self, asset: &str) -> Result<(), AudioError> {
        self.stop_audio();
        self.backend.configure(&self.session).map_err(|e| {
            tracing::warn!(error = %e, "audio session configuration failed");
            e
        })?;
        match self.backend.load_and_play(asset, &self.options) {
            Ok(handle) => {
                tracing::debug!(asset, id = handle.id(), "audio playing");
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(asset, error = %e, "audio asset unavailable");
                Err(e)
            }
        }
    }

    /// Stop and release the current handle. Safe to call with none held.
    /// Returns whether a handle was released.
    pub fn stop_audio(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                self.backend.stop(&handle);
                self.backend.unload(handle);
                tracing::debug!("audio released");
                true
            }
            None => false,
        }
    }
}
