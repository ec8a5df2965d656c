//! Preference store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Reading or writing the preference file failed.
    #[error("設定ファイルの入出力に失敗しました ({path}): {message}")]
    Io { path: PathBuf, message: String },

    /// The preference file could not be encoded or decoded.
    #[error("設定ファイルの形式が不正です: {0}")]
    Format(String),

    /// No per-user configuration directory exists on this platform.
    #[error("設定ディレクトリが見つかりません")]
    NoConfigDir,

    /// A stored value does not parse as the expected type.
    #[error("設定値 '{key}' が不正です: {message}")]
    InvalidValue { key: String, message: String },
}

impl PreferenceError {
    /// Returns true if the error comes from the filesystem.
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::NoConfigDir)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "ファイルの権限を確認してください",
            Self::Format(_) => "設定ファイルを削除すると初期設定に戻ります",
            Self::NoConfigDir => "`--prefs` で設定ファイルのパスを指定してください",
            Self::InvalidValue { .. } => "値を設定し直してください",
        }
    }
}
