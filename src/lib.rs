//! pomotip Library
//!
//! This library provides the core functionality of the pomotip CLI.
//! It includes:
//! - Session state machine and its async runtime
//! - Display sink abstraction with a terminal renderer
//! - Break-time tips from a chat-completion endpoint with offline fallback
//! - Preference storage for the API key, theme and durations
//! - Synthesized sound cues
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state

pub mod cli;
pub mod display;
pub mod prefs;
pub mod session;
pub mod sound;
pub mod tips;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{Phase, SessionConfig, SessionState, SessionStatus, Theme};

// Re-export session types
pub use session::{Command, SessionController, SessionError, SessionEvent, SessionHandle, SessionRuntime};

// Re-export display types
pub use display::{
    ControlLabel, ControlStyle, ControlView, DisplayError, DisplaySink, Presenter,
    RecordingDisplay, TerminalDisplay, TipView,
};

// Re-export tip types
pub use tips::{ChatCompletionTipProvider, MockTipProvider, TipError, TipProvider, TipResult};

// Re-export preference types
pub use prefs::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore};

// Re-export sound types
pub use sound::{Cue, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer};
