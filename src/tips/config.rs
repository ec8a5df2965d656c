//! Tip service configuration types.

use serde::{Deserialize, Serialize};

/// Environment variable overriding the endpoint URL.
pub const ENDPOINT_ENV: &str = "POMOTIP_ENDPOINT";

/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "POMOTIP_MODEL";

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    80
}

fn default_temperature() -> f32 {
    0.9
}

fn default_instruction() -> String {
    "Give me one short, practical, advanced UI/UX design tip for a product designer \
     taking a five minute break. Answer with the tip only, in at most two sentences."
        .to_string()
}

/// Settings for the remote chat-completion tip service.
///
/// # Example
///
/// ```
/// use pomotip::tips::TipServiceConfig;
///
/// let config = TipServiceConfig::default();
/// assert!(config.endpoint.starts_with("https://"));
/// assert_eq!(config.max_tokens, 80);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TipServiceConfig {
    /// Chat-completion endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name sent with each request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on the generated tip length.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Fixed prompt sent as the single user message.
    #[serde(default = "default_instruction")]
    pub instruction: String,
}

impl Default for TipServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            instruction: default_instruction(),
        }
    }
}

impl TipServiceConfig {
    /// Creates the default configuration with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(ENDPOINT_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        )
    }

    /// Replaces the endpoint and model when values are given.
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, endpoint: Option<String>, model: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|s| !s.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(model) = model.filter(|s| !s.trim().is_empty()) {
            self.model = model.trim().to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TipServiceConfig::default();

        assert_eq!(
            config.endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 80);
        assert!(config.instruction.contains("tip"));
    }

    #[test]
    fn test_with_overrides() {
        let config = TipServiceConfig::default().with_overrides(
            Some(" http://127.0.0.1:8080/v1/chat ".to_string()),
            Some("local-model".to_string()),
        );

        assert_eq!(config.endpoint, "http://127.0.0.1:8080/v1/chat");
        assert_eq!(config.model, "local-model");
    }

    #[test]
    fn test_with_overrides_ignores_blank() {
        let config =
            TipServiceConfig::default().with_overrides(Some("  ".to_string()), None);

        assert_eq!(config, TipServiceConfig::default());
    }

    #[test]
    fn test_deserialize_json_with_defaults() {
        let json = r#"{"model": "gpt-4o"}"#;

        let config: TipServiceConfig = serde_json::from_str(json).expect("Failed to deserialize");

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 80);
        assert_eq!(config.endpoint, default_endpoint());
    }

    #[test]
    fn test_deserialize_empty_json() {
        let config: TipServiceConfig = serde_json::from_str("{}").expect("Failed to deserialize");

        assert_eq!(config, TipServiceConfig::default());
    }
}
