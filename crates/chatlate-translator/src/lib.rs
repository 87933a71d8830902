mod deepl;
mod google;

pub use deepl::DeepLTranslator;
pub use google::GoogleTranslator;

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text into `to`, letting the provider detect the source language
    async fn translate(&self, text: &str, to: &str) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// Detected source language, "auto" when the provider did not report one
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Empty input")]
    EmptyInput,
}

/// Guard every provider runs before touching the network
pub(crate) fn ensure_not_empty(text: &str) -> Result<(), TranslateError> {
    if text.is_empty() {
        return Err(TranslateError::EmptyInput);
    }
    Ok(())
}

/// Map common HTTP failure statuses
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), TranslateError> {
    match status.as_u16() {
        429 => Err(TranslateError::RateLimitExceeded),
        401 | 403 => Err(TranslateError::AuthenticationError),
        _ if !status.is_success() => Err(TranslateError::ApiError(format!("HTTP {status}"))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            ensure_not_empty(""),
            Err(TranslateError::EmptyInput)
        ));
        assert!(ensure_not_empty(" ").is_ok());
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS),
            Err(TranslateError::RateLimitExceeded)
        ));
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN),
            Err(TranslateError::AuthenticationError)
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY),
            Err(TranslateError::ApiError(_))
        ));
    }
}
