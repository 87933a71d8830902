use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "eng".to_string()
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code, e.g. "eng"
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    pub tessdata_dir: Option<String>,
    /// Page segmentation mode; engine default when unset
    pub psm: Option<u8>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tesseract_path: default_tesseract_path(),
            tessdata_dir: None,
            psm: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}
