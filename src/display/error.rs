//! Display error types.

use thiserror::Error;

/// Errors raised by a display sink.
///
/// The presenter logs these and carries on; a broken display never stops
/// the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Writing to the output failed.
    #[error("画面への出力に失敗しました: {0}")]
    Write(String),

    /// The display cannot be updated right now.
    #[error("表示を更新できません: {0}")]
    Unavailable(String),
}

impl DisplayError {
    /// Returns true if the error came from the output stream.
    #[must_use]
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::Write(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Write(_) => "ターミナルの出力先を確認してください",
            Self::Unavailable(_) => "アプリケーションを再起動してください",
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        Self::Write(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = DisplayError::from(io);
        assert!(err.is_write_error());
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_suggestion() {
        assert!(DisplayError::Write("x".into())
            .suggestion()
            .contains("ターミナル"));
        assert!(!DisplayError::Unavailable("x".into()).is_write_error());
    }
}
