//! Tip service error types.
//!
//! Every error here is non-fatal for the session. The display layer maps
//! each one either to an actionable message (the user has to fix their API
//! key) or to a silent fallback onto the offline tip collection.

use thiserror::Error;

/// Classification of a failed tip request, without details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipErrorKind {
    NotConfigured,
    InvalidCredentialFormat,
    InvalidCredential,
    RateLimited,
    RemoteServerError,
    ApiError,
    NetworkError,
    MalformedResponse,
    Unknown,
}

/// Errors that can occur while requesting a tip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TipError {
    /// No API key has been stored.
    #[error("APIキーが設定されていません")]
    NotConfigured,

    /// The stored API key fails the local syntax check.
    #[error("APIキーの形式が正しくありません: {0}")]
    InvalidCredentialFormat(String),

    /// The remote service rejected the API key (HTTP 401).
    #[error("APIキーが拒否されました (HTTP 401)")]
    InvalidCredential,

    /// Too many requests (HTTP 429).
    #[error("リクエスト数の上限に達しました (HTTP 429)")]
    RateLimited,

    /// The remote service failed (HTTP 5xx).
    #[error("チップサービスでサーバーエラーが発生しました (HTTP {0})")]
    RemoteServerError(u16),

    /// Any other non-success status.
    #[error("チップサービスがエラーを返しました (HTTP {0})")]
    ApiError(u16),

    /// The request never produced an HTTP response.
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// The response did not have the expected shape.
    #[error("レスポンスの形式が不正です: {0}")]
    MalformedResponse(String),

    /// The request could not be built or sent for another reason.
    #[error("不明なエラー: {0}")]
    Unknown(String),
}

impl TipError {
    /// Returns the detail-free classification of this error.
    #[must_use]
    pub fn kind(&self) -> TipErrorKind {
        match self {
            Self::NotConfigured => TipErrorKind::NotConfigured,
            Self::InvalidCredentialFormat(_) => TipErrorKind::InvalidCredentialFormat,
            Self::InvalidCredential => TipErrorKind::InvalidCredential,
            Self::RateLimited => TipErrorKind::RateLimited,
            Self::RemoteServerError(_) => TipErrorKind::RemoteServerError,
            Self::ApiError(_) => TipErrorKind::ApiError,
            Self::NetworkError(_) => TipErrorKind::NetworkError,
            Self::MalformedResponse(_) => TipErrorKind::MalformedResponse,
            Self::Unknown(_) => TipErrorKind::Unknown,
        }
    }

    /// Returns true if no API key is stored.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Returns true if the API key is wrong and the user has to replace it.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentialFormat(_) | Self::InvalidCredential
        )
    }

    /// Returns true if the user has to act before tips can be fetched.
    ///
    /// Everything else falls back to an offline tip.
    #[must_use]
    pub fn requires_user_action(&self) -> bool {
        self.is_not_configured() || self.is_credential_error()
    }

    /// Returns the short caption shown under a fallback tip.
    #[must_use]
    pub fn fallback_caption(&self) -> &'static str {
        match self {
            Self::RateLimited => "リクエストが多すぎるため、オフラインのヒントを表示しています",
            Self::RemoteServerError(_) => {
                "チップサービスが不調のため、オフラインのヒントを表示しています"
            }
            Self::NetworkError(_) => "オフラインのため、保存済みのヒントを表示しています",
            Self::MalformedResponse(_) | Self::ApiError(_) | Self::Unknown(_) => {
                "ヒントを取得できなかったため、保存済みのヒントを表示しています"
            }
            Self::NotConfigured | Self::InvalidCredentialFormat(_) | Self::InvalidCredential => "",
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NotConfigured => "`pomotip key set <KEY>` でAPIキーを設定してください",
            Self::InvalidCredentialFormat(_) => {
                "`sk-` で始まるAPIキーを `pomotip key set <KEY>` で設定し直してください"
            }
            Self::InvalidCredential => {
                "APIキーが有効か確認し、`pomotip key set <KEY>` で設定し直してください"
            }
            Self::RateLimited => "しばらく待ってから再試行してください",
            Self::RemoteServerError(_) => "時間をおいて再試行してください",
            Self::ApiError(_) => "エンドポイントとモデルの設定を確認してください",
            Self::NetworkError(_) => "ネットワーク接続を確認してください",
            Self::MalformedResponse(_) => "エンドポイントの設定を確認してください",
            Self::Unknown(_) => "アプリケーションを再起動してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_errors() -> Vec<TipError> {
        vec![
            TipError::NotConfigured,
            TipError::InvalidCredentialFormat("too short".into()),
            TipError::InvalidCredential,
            TipError::RateLimited,
            TipError::RemoteServerError(503),
            TipError::ApiError(404),
            TipError::NetworkError("connection refused".into()),
            TipError::MalformedResponse("missing choices".into()),
            TipError::Unknown("x".into()),
        ]
    }

    #[test]
    fn test_error_display() {
        assert!(TipError::RemoteServerError(503).to_string().contains("503"));
        assert!(TipError::ApiError(404).to_string().contains("404"));
        assert!(TipError::NetworkError("refused".into())
            .to_string()
            .contains("refused"));
        assert!(TipError::InvalidCredentialFormat("too short".into())
            .to_string()
            .contains("too short"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(TipError::NotConfigured.kind(), TipErrorKind::NotConfigured);
        assert_eq!(
            TipError::RemoteServerError(500).kind(),
            TipErrorKind::RemoteServerError
        );
        assert_eq!(
            TipError::MalformedResponse("x".into()).kind(),
            TipErrorKind::MalformedResponse
        );
    }

    #[test]
    fn test_requires_user_action() {
        assert!(TipError::NotConfigured.requires_user_action());
        assert!(TipError::InvalidCredentialFormat("x".into()).requires_user_action());
        assert!(TipError::InvalidCredential.requires_user_action());
        assert!(!TipError::RateLimited.requires_user_action());
        assert!(!TipError::RemoteServerError(500).requires_user_action());
        assert!(!TipError::ApiError(418).requires_user_action());
        assert!(!TipError::NetworkError("x".into()).requires_user_action());
        assert!(!TipError::MalformedResponse("x".into()).requires_user_action());
        assert!(!TipError::Unknown("x".into()).requires_user_action());
    }

    #[test]
    fn test_not_configured_is_not_a_credential_error() {
        assert!(TipError::NotConfigured.is_not_configured());
        assert!(!TipError::NotConfigured.is_credential_error());
    }

    #[test]
    fn test_fallback_caption_only_for_fallback_errors() {
        for error in all_errors() {
            assert_eq!(
                error.fallback_caption().is_empty(),
                error.requires_user_action(),
                "unexpected caption for {:?}",
                error
            );
        }
    }

    #[test]
    fn test_suggestion() {
        for error in all_errors() {
            assert!(!error.suggestion().is_empty());
        }
        assert!(TipError::NotConfigured.suggestion().contains("key set"));
    }
}
