use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_to_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorProvider {
    #[default]
    Google,
    DeepL,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub provider: TranslatorProvider,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    #[serde(default)]
    pub api_key: String,
    /// Provider endpoint override
    pub api_url: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: TranslatorProvider::default(),
            to_lang: default_to_lang(),
            api_key: String::new(),
            api_url: None,
        }
    }
}
