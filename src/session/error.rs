//! Session state machine error types.

use thiserror::Error;

use crate::types::Phase;

/// Illegal transitions requested of the session controller.
///
/// None of these change the state; the request is simply refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested phase is already counting down.
    #[error("{}タイマーは既に実行中です", .0.label())]
    AlreadyRunning(Phase),

    /// Pause was requested while nothing runs.
    #[error("タイマーは実行されていません")]
    NotRunning,

    /// A configured duration is out of range.
    #[error("{0}")]
    InvalidDuration(String),

    /// The event receiver has been dropped.
    #[error("イベントチャネルが閉じられています")]
    EventChannelClosed,

    /// The session runtime is no longer accepting input.
    #[error("セッションは終了しています")]
    Stopped,
}

impl SessionError {
    /// Returns true if the error is a refused user command.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::EventChannelClosed | Self::Stopped)
    }
}
