//! Sound cues for the timer.
//!
//! This module provides audio feedback for session transitions:
//!
//! - A start cue whenever a countdown starts
//! - A completion cue when a work countdown finishes
//! - A reset cue under the retro theme
//! - Graceful degradation when audio is unavailable
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomotip::sound::{Cue, RodioSoundPlayer};
//!
//! // Create a player (may fail if no audio device)
//! let player = RodioSoundPlayer::new(false).expect("audio init");
//! player.play(Cue::Start).expect("playback failed");
//! ```

mod cue;
mod error;
mod player;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use cue::{Cue, Tone};
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a cue without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: Cue) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables sound playback.
    fn enable(&self);

    /// Disables sound playback.
    fn disable(&self);
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, cue)
    }

    fn is_available(&self) -> bool {
        RodioSoundPlayer::is_available(self)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }

    fn enable(&self) {
        RodioSoundPlayer::enable(self)
    }

    fn disable(&self) {
        RodioSoundPlayer::disable(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<Cue>>,
    available: AtomicBool,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            disabled: AtomicBool::new(false),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<Cue> {
        self.play_calls.lock().unwrap().clone()
    }

    /// Returns how many times `cue` was played.
    #[must_use]
    pub fn count_of(&self, cue: Cue) -> usize {
        self.play_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|played| **played == cue)
            .count()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.play_calls.lock().unwrap().push(cue);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}
