//! Chat-completion tip provider using reqwest.
//!
//! One POST per tip. The API key is read from the preference store on every
//! request, so a key set while a session runs takes effect on the next break.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::prefs::{load_api_key, PreferenceStore};

use super::config::TipServiceConfig;
use super::credential::validate_api_key;
use super::error::TipError;
use super::{TipProvider, TipResult};

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ============================================================================
// Classification
// ============================================================================

/// Maps a non-success HTTP status to a tip error.
#[must_use]
pub fn classify_status(status: u16) -> TipError {
    match status {
        401 => TipError::InvalidCredential,
        429 => TipError::RateLimited,
        s if s >= 500 => TipError::RemoteServerError(s),
        s => TipError::ApiError(s),
    }
}

/// Maps a failure to obtain a response, or to read its body, to a tip error.
///
/// Connection, timeout and body transfer problems are network errors;
/// anything else (an unusable endpoint URL, a redirect loop) is unknown.
fn classify_transport(error: &reqwest::Error) -> TipError {
    if error.is_connect() || error.is_timeout() || error.is_request() || error.is_body() {
        TipError::NetworkError(error.to_string())
    } else {
        TipError::Unknown(error.to_string())
    }
}

/// Extracts the tip text from a chat-completion response body.
///
/// # Errors
///
/// Returns `TipError::MalformedResponse` if the body is not JSON, has no
/// choices, or the first choice carries no text.
pub fn parse_completion(body: &str) -> Result<String, TipError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| TipError::MalformedResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TipError::MalformedResponse("choices が空です".to_string()))?
        .message
        .content
        .ok_or_else(|| TipError::MalformedResponse("message.content がありません".to_string()))?;

    let text = content.trim();
    if text.is_empty() {
        return Err(TipError::MalformedResponse(
            "message.content が空です".to_string(),
        ));
    }
    Ok(text.to_string())
}

// ============================================================================
// ChatCompletionTipProvider
// ============================================================================

/// Tip provider backed by a chat-completion HTTP endpoint.
pub struct ChatCompletionTipProvider {
    client: reqwest::Client,
    config: TipServiceConfig,
    prefs: Arc<dyn PreferenceStore>,
}

impl ChatCompletionTipProvider {
    /// Creates a provider reading its API key from `prefs`.
    #[must_use]
    pub fn new(config: TipServiceConfig, prefs: Arc<dyn PreferenceStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            prefs,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &TipServiceConfig {
        &self.config
    }

    fn api_key(&self) -> Result<String, TipError> {
        match load_api_key(self.prefs.as_ref()) {
            Ok(Some(key)) => Ok(key),
            Ok(None) => Err(TipError::NotConfigured),
            Err(e) => {
                warn!("Could not read API key: {}", e);
                Err(TipError::NotConfigured)
            }
        }
    }
}

impl std::fmt::Debug for ChatCompletionTipProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionTipProvider")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TipProvider for ChatCompletionTipProvider {
    async fn request_tip(&self) -> TipResult {
        let key = self.api_key()?;
        validate_api_key(&key)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: &self.config.instruction,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Requesting tip from {}", self.config.endpoint);
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Tip service answered {}", status);
            return Err(classify_status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| classify_transport(&e))?;
        parse_completion(&text)
    }
}
