use async_trait::async_trait;

use crate::{ProviderMetadata, TranslateError, Translation, Translator, check_status, ensure_not_empty};

const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";

#[derive(Clone)]
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String, api_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str, to: &str) -> Result<Translation, TranslateError> {
        ensure_not_empty(text)?;

        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let target = to.to_uppercase();
        let params = [("text", text), ("target_lang", target.as_str())];

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&params)
            .send()
            .await?;
        check_status(response.status())?;

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        let translation = json["translations"]
            .get(0)
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

        let translated_text = translation["text"]
            .as_str()
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

        let detected = translation["detected_source_language"]
            .as_str()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "auto".to_string());

        Ok(Translation {
            text: translated_text.to_string(),
            from: detected,
            to: to.to_string(),
            provider: "deepl".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepL".to_string(),
            requires_api_key: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_authentication_error() {
        let translator = DeepLTranslator::new(String::new(), None);

        let result = translator.translate("gg", "en").await;

        assert!(matches!(result, Err(TranslateError::AuthenticationError)));
    }

    #[tokio::test]
    async fn test_empty_text_checked_before_key() {
        let translator = DeepLTranslator::new(String::new(), None);

        let result = translator.translate("", "en").await;

        assert!(matches!(result, Err(TranslateError::EmptyInput)));
    }
}
