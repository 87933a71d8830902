use async_trait::async_trait;

use crate::{ProviderMetadata, TranslateError, Translation, Translator, check_status, ensure_not_empty};

const DEFAULT_API_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Keyless Google Translate web endpoint
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(api_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, to: &str) -> Result<Translation, TranslateError> {
        ensure_not_empty(text)?;

        let params = [
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", to),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        check_status(response.status())?;

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        let (translated, detected) = parse_response(&json)?;

        Ok(Translation {
            text: translated,
            from: detected.unwrap_or_else(|| "auto".to_string()),
            to: to.to_string(),
            provider: "google".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google".to_string(),
            requires_api_key: false,
        }
    }
}

/// Response shape: `[[["translated", "original", ..], ..], null, "detected", ..]`
fn parse_response(json: &serde_json::Value) -> Result<(String, Option<String>), TranslateError> {
    let segments = json
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    let detected = json.get(2).and_then(|l| l.as_str()).map(str::to_string);

    Ok((translated, detected))
}
