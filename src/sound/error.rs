//! Sound system error types.
//!
//! Sound is optional: every error here is logged and the session carries on
//! silently.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続するか、--no-sound を指定してください",
            Self::StreamError(_) => "オーディオ設定を確認してください",
            Self::PlaybackError(_) => "アプリケーションを再起動してください",
        }
    }
}
