//! Rendering of the session.
//!
//! The session never writes to the screen directly. A [`Presenter`] turns
//! controller events into calls on a [`DisplaySink`], which is either the
//! ANSI terminal renderer or a recording sink used by tests.
//!
//! # Architecture
//!
//! ```text
//! SessionEvent ──▶ Presenter ──▶ DisplaySink
//!                     │            ├─ TerminalDisplay (ANSI status line)
//!                     │            └─ RecordingDisplay (tests)
//!                     └─ offline tip choice (rand)
//! ```

mod error;
mod presenter;
mod recording;
mod terminal;

pub use error::DisplayError;
pub use presenter::Presenter;
pub use recording::{RecordedView, RecordingDisplay};
pub use terminal::TerminalDisplay;

use crate::tips::TipResult;
use crate::types::{Phase, SessionState, Theme};

// ============================================================================
// Control view
// ============================================================================

/// Label shown on a phase control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLabel {
    Start,
    Pause,
}

impl ControlLabel {
    /// Returns the user-facing label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlLabel::Start => "開始",
            ControlLabel::Pause => "一時停止",
        }
    }
}

/// Visual style of a phase control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStyle {
    /// Waiting to be started
    Ready,
    /// Currently counting down
    Active,
}

/// How one phase control should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub label: ControlLabel,
    pub style: ControlStyle,
}

impl ControlView {
    /// Derives the control of `phase` from the session state.
    ///
    /// Only the running phase offers "pause"; every other control offers
    /// "start", including a paused one.
    pub fn for_phase(state: &SessionState, phase: Phase) -> Self {
        if state.is_running_phase(phase) {
            Self {
                label: ControlLabel::Pause,
                style: ControlStyle::Active,
            }
        } else {
            Self {
                label: ControlLabel::Start,
                style: ControlStyle::Ready,
            }
        }
    }
}

// ============================================================================
// Tip view
// ============================================================================

/// What the tip panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipView {
    /// A request is in flight.
    Loading,
    /// Tip returned by the remote service.
    Remote { text: String },
    /// Offline tip shown because the service failed.
    Fallback { text: String, caption: String },
    /// Offline tip shown because no API key is stored, with a settings hint.
    Unconfigured { text: String, hint: String },
    /// The stored API key is wrong; no tip is shown.
    CredentialProblem { message: String, hint: String },
}

impl TipView {
    /// Maps a tip result to what the user sees.
    ///
    /// `offline_tip` is used for every error that falls back to the local
    /// collection.
    pub fn from_result(result: &TipResult, offline_tip: &str) -> Self {
        match result {
            Ok(text) => TipView::Remote { text: text.clone() },
            Err(err) if err.is_not_configured() => TipView::Unconfigured {
                text: offline_tip.to_string(),
                hint: err.suggestion().to_string(),
            },
            Err(err) if err.is_credential_error() => TipView::CredentialProblem {
                message: err.to_string(),
                hint: err.suggestion().to_string(),
            },
            Err(err) => TipView::Fallback {
                text: offline_tip.to_string(),
                caption: err.fallback_caption().to_string(),
            },
        }
    }

    /// Returns the tip text, if any is shown.
    pub fn text(&self) -> Option<&str> {
        match self {
            TipView::Remote { text }
            | TipView::Fallback { text, .. }
            | TipView::Unconfigured { text, .. } => Some(text),
            TipView::Loading | TipView::CredentialProblem { .. } => None,
        }
    }
}

// ============================================================================
// DisplaySink
// ============================================================================

/// Setter interface of a session display.
pub trait DisplaySink {
    /// Shows the remaining time of `phase`, already formatted.
    fn set_remaining(&mut self, phase: Phase, text: &str) -> Result<(), DisplayError>;

    /// Updates the control of `phase`.
    fn set_control(&mut self, phase: Phase, view: ControlView) -> Result<(), DisplayError>;

    /// Emphasizes the active phase and dims the other. `None` clears both.
    fn set_emphasis(&mut self, active: Option<Phase>) -> Result<(), DisplayError>;

    /// Turns the calm break ambience on or off.
    fn set_ambient(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Replaces the content of the tip panel.
    fn set_tip(&mut self, tip: &TipView) -> Result<(), DisplayError>;

    /// Celebrates a finished countdown.
    fn celebrate(&mut self, phase: Phase) -> Result<(), DisplayError>;

    /// Switches the color theme.
    fn set_theme(&mut self, theme: Theme) -> Result<(), DisplayError>;
}
