//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which synthesizes cue tones
//! with rodio v0.20 sine sources.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::cue::Cue;
use super::error::SoundError;

/// Attack applied to each tone to avoid clicks.
const FADE_IN: Duration = Duration::from_millis(10);

/// A sound player that uses rodio for audio playback.
///
/// Sound playback is non-blocking; cues continue playing in the background.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether sound playback is disabled.
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Creates a new sound player.
    ///
    /// # Arguments
    ///
    /// * `disabled` - If true, all sound playback will be silently skipped.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Plays a cue.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::StreamError` if no sink can be attached to the
    /// output stream.
    pub fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        for tone in cue.tones() {
            let source = SineWave::new(tone.frequency_hz)
                .take_duration(tone.duration)
                .fade_in(FADE_IN)
                .amplify(tone.amplitude);
            sink.append(source);
        }
        sink.detach(); // Non-blocking: sound continues after function returns

        debug!("Playing {} cue (detached)", cue.as_str());
        Ok(())
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables sound playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
        debug!("Sound playback enabled");
    }

    /// Disables sound playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
        debug!("Sound playback disabled");
    }

    /// Returns true if the audio system is available.
    ///
    /// Always true once the player exists, since the stream is opened
    /// during construction.
    #[must_use]
    pub fn is_available(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(disabled: bool) -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new(disabled) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
