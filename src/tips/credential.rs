//! Local API key checks.
//!
//! A key that fails these checks never reaches the network.

use super::error::TipError;

/// Prefix every accepted key starts with.
pub const API_KEY_PREFIX: &str = "sk-";

/// Shortest accepted key, prefix included.
pub const MIN_API_KEY_LENGTH: usize = 20;

/// Longest accepted key.
pub const MAX_API_KEY_LENGTH: usize = 256;

/// Checks the syntax of an API key.
///
/// # Errors
///
/// Returns `TipError::InvalidCredentialFormat` describing the first problem.
pub fn validate_api_key(key: &str) -> Result<(), TipError> {
    if key.is_empty() {
        return Err(TipError::InvalidCredentialFormat(
            "キーが空です".to_string(),
        ));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(TipError::InvalidCredentialFormat(
            "空白文字を含めることはできません".to_string(),
        ));
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(TipError::InvalidCredentialFormat(format!(
            "`{}` で始まる必要があります",
            API_KEY_PREFIX
        )));
    }
    if key.len() < MIN_API_KEY_LENGTH || key.len() > MAX_API_KEY_LENGTH {
        return Err(TipError::InvalidCredentialFormat(format!(
            "長さは{}から{}文字の範囲である必要があります",
            MIN_API_KEY_LENGTH, MAX_API_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Masks a key for display, keeping the prefix and the last four characters.
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= API_KEY_PREFIX.len() + 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..API_KEY_PREFIX.len()].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_KEY: &str = "sk-test-0123456789abcdef";

    #[test]
    fn test_valid_key() {
        assert!(validate_api_key(VALID_KEY).is_ok());
    }

    #[test]
    fn test_empty_key() {
        let err = validate_api_key("").unwrap_err();
        assert!(matches!(err, TipError::InvalidCredentialFormat(_)));
    }

    #[test]
    fn test_wrong_prefix() {
        let err = validate_api_key("pk-test-0123456789abcdef").unwrap_err();
        assert!(err.to_string().contains("sk-"));
    }

    #[test]
    fn test_too_short() {
        assert!(validate_api_key("sk-short").is_err());
    }

    #[test]
    fn test_too_long() {
        let key = format!("sk-{}", "a".repeat(MAX_API_KEY_LENGTH));
        assert!(validate_api_key(&key).is_err());
    }

    #[test]
    fn test_whitespace() {
        assert!(validate_api_key("sk-test 0123456789abcdef").is_err());
        assert!(validate_api_key("sk-test-0123456789abcdef\n").is_err());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask_api_key(VALID_KEY), "sk-...cdef");
        assert_eq!(mask_api_key("sk-ab"), "*****");
    }
}
