//! Audio backends available to the terminal host.

use std::fs::File;
use std::path::Path;

use hypnoflow_core::{AudioBackend, AudioError, AudioHandle, AudioSessionConfig, PlaybackOptions};

/// Real playback through the default output device.
#[cfg(feature = "playback")]
pub fn default_backend() -> Box<dyn AudioBackend> {
    Box::new(playback::RodioBackend::default())
}

/// Silent asset checker; build with `playback` for sound.
#[cfg(not(feature = "playback"))]
pub fn default_backend() -> Box<dyn AudioBackend> {
    Box::new(AssetCheckBackend::default())
}

fn open_asset(asset: &str) -> Result<File, AudioError> {
    let missing = |message: String| AudioError::MissingAsset {
        asset: asset.to_string(),
        message,
    };
    let path = Path::new(asset);
    if !path.is_file() {
        return Err(missing("no such file".into()));
    }
    File::open(path).map_err(|e| missing(e.to_string()))
}

/// Verifies the asset is present and readable but produces no sound.
/// Keeps the missing-asset path honest on machines without an output
/// device.
#[derive(Debug, Default)]
pub struct AssetCheckBackend {
    next_id: u64,
}

impl AudioBackend for AssetCheckBackend {
    fn configure(&mut self, config: &AudioSessionConfig) -> Result<(), AudioError> {
        tracing::debug!(?config, "audio session (silent)");
        Ok(())
    }

    fn load_and_play(
        &mut self,
        asset: &str,
        options: &PlaybackOptions,
    ) -> Result<AudioHandle, AudioError> {
        open_asset(asset)?;
        self.next_id += 1;
        tracing::info!(asset, volume = options.volume, "audio asset found; playing silently");
        Ok(AudioHandle::new(self.next_id, asset))
    }

    fn stop(&mut self, handle: &AudioHandle) {
        tracing::debug!(id = handle.id(), "silent stop");
    }

    fn unload(&mut self, handle: AudioHandle) {
        tracing::debug!(id = handle.id(), "silent unload");
    }
}

#[cfg(feature = "playback")]
mod playback {
    use std::collections::HashMap;
    use std::io::BufReader;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::open_asset;
    use hypnoflow_core::{AudioBackend, AudioError, AudioHandle, AudioSessionConfig, PlaybackOptions};

    /// Plays through the default output device.
    #[derive(Default)]
    pub struct RodioBackend {
        stream: Option<(OutputStream, OutputStreamHandle)>,
        sinks: HashMap<u64, Sink>,
        next_id: u64,
    }

    impl AudioBackend for RodioBackend {
        fn configure(&mut self, _config: &AudioSessionConfig) -> Result<(), AudioError> {
            if self.stream.is_none() {
                let stream = OutputStream::try_default().map_err(|e| AudioError::PlaybackConfiguration {
                    message: e.to_string(),
                })?;
                self.stream = Some(stream);
            }
            Ok(())
        }

        fn load_and_play(
            &mut self,
            asset: &str,
            options: &PlaybackOptions,
        ) -> Result<AudioHandle, AudioError> {
            let (_, handle) = self.stream.as_ref().ok_or_else(|| AudioError::PlaybackConfiguration {
                message: "output stream not open".into(),
            })?;
            let file = open_asset(asset)?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::MissingAsset {
                asset: asset.to_string(),
                message: e.to_string(),
            })?;
            let sink = Sink::try_new(handle).map_err(|e| AudioError::PlaybackConfiguration {
                message: e.to_string(),
            })?;
            sink.set_volume(options.volume);
            if options.looping {
                sink.append(source.repeat_infinite());
            } else {
                sink.append(source);
            }
            if !options.autoplay {
                sink.pause();
            }
            self.next_id += 1;
            self.sinks.insert(self.next_id, sink);
            Ok(AudioHandle::new(self.next_id, asset))
        }

        fn stop(&mut self, handle: &AudioHandle) {
            if let Some(sink) = self.sinks.get(&handle.id()) {
                sink.stop();
            }
        }

        fn unload(&mut self, handle: AudioHandle) {
            self.sinks.remove(&handle.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_missing_asset() {
        let mut backend = AssetCheckBackend::default();
        let err = backend
            .load_and_play("definitely/not/here.mp3", &PlaybackOptions::default())
            .unwrap_err();
        assert!(matches!(err, AudioError::MissingAsset { .. }));
    }

    #[test]
    fn existing_file_yields_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.mp3");
        std::fs::write(&path, b"ID3").unwrap();
        let mut backend = AssetCheckBackend::default();
        let handle = backend
            .load_and_play(path.to_str().unwrap(), &PlaybackOptions::default())
            .unwrap();
        assert_eq!(handle.id(), 1);
        backend.stop(&handle);
        backend.unload(handle);
    }
}
