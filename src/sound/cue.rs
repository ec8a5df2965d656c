//! Audio cue definitions.
//!
//! Cues are short synthesized tone sequences, so no sound files ship with
//! the binary.

use std::time::Duration;

/// One sine segment of a cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz.
    pub frequency_hz: f32,
    /// Length of the segment.
    pub duration: Duration,
    /// Linear gain (0.0-1.0).
    pub amplitude: f32,
}

impl Tone {
    const fn new(frequency_hz: f32, millis: u64, amplitude: f32) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(millis),
            amplitude,
        }
    }
}

const START_TONES: [Tone; 2] = [Tone::new(800.0, 100, 0.3), Tone::new(1000.0, 200, 0.3)];
const COMPLETION_TONES: [Tone; 1] = [Tone::new(220.0, 2000, 0.4)];
const RESET_TONES: [Tone; 2] = [Tone::new(440.0, 80, 0.2), Tone::new(330.0, 120, 0.2)];

/// Sounds the session can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Two-tone "ba-ding" when a countdown starts
    Start,
    /// Low bell when a work countdown finishes
    Completion,
    /// Short descending blip on reset (retro theme only)
    Reset,
}

impl Cue {
    /// Returns the tone segments, played back to back.
    #[must_use]
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            Cue::Start => &START_TONES,
            Cue::Completion => &COMPLETION_TONES,
            Cue::Reset => &RESET_TONES,
        }
    }

    /// Returns the string representation of the cue.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Start => "start",
            Cue::Completion => "completion",
            Cue::Reset => "reset",
        }
    }

    /// Returns the total playback length.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.tones().iter().map(|tone| tone.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_two_rising_tones() {
        let tones = Cue::Start.tones();
        assert_eq!(tones.len(), 2);
        assert!(tones[0].frequency_hz < tones[1].frequency_hz);
        assert_eq!(Cue::Start.total_duration(), Duration::from_millis(300));
    }

    #[test]
    fn test_completion_is_long_low_tone() {
        let tones = Cue::Completion.tones();
        assert_eq!(tones.len(), 1);
        assert_eq!(tones[0].frequency_hz, 220.0);
        assert_eq!(Cue::Completion.total_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_amplitudes_are_in_range() {
        for cue in [Cue::Start, Cue::Completion, Cue::Reset] {
            for tone in cue.tones() {
                assert!(tone.amplitude > 0.0 && tone.amplitude <= 1.0);
            }
        }
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Cue::Start.as_str(), "start");
        assert_eq!(Cue::Completion.as_str(), "completion");
        assert_eq!(Cue::Reset.as_str(), "reset");
    }
}
