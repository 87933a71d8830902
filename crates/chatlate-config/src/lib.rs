use std::env;

use chatlate_core::PipelineError;
use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::ocr::OcrConfig;
use self::pipeline::PipelineConfig;
use self::translator::TranslatorConfig;

pub mod capture;
pub mod ocr;
pub mod pipeline;
pub mod translator;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(language) = env::var("CHATLATE_OCR_LANG") {
            self.ocr.language = language;
        }

        if let Ok(to_lang) = env::var("CHATLATE_TARGET_LANG") {
            self.translator.to_lang = to_lang;
        }

        if let Ok(path) = env::var("TESSERACT_PATH") {
            self.ocr.tesseract_path = path;
        }

        if self.ocr.tessdata_dir.is_none() {
            self.ocr.tessdata_dir = env::var("TESSDATA_PREFIX").ok();
        }

        if let Ok(key) = env::var("TRANSLATOR_API_KEY") {
            self.translator.api_key = key;
        }
    }

    /// Startup checks that would otherwise fail on every iteration
    pub fn validate(&self) -> Result<(), PipelineError> {
        let capture = &self.capture;
        if !capture.roi.fits_within(capture.reference_resolution) {
            return Err(PipelineError::RegionOutOfBounds {
                roi: capture.roi,
                bounds: capture.reference_resolution,
            });
        }

        Ok(())
    }
}
