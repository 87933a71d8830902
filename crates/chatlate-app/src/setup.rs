use std::time::Duration;

use anyhow::bail;
use chatlate_config::capture::{CaptureConfig, CaptureSource};
use chatlate_config::ocr::OcrConfig;
use chatlate_config::translator::{TranslatorConfig, TranslatorProvider};
use chatlate_ocr::{FileCapture, MonitorCapture, ScreenCapture, TesseractEngine, WindowCapture};
use chatlate_translator::{DeepLTranslator, GoogleTranslator, Translator};

pub fn build_capture(config: &CaptureConfig) -> Box<dyn ScreenCapture> {
    match &config.source {
        CaptureSource::PrimaryMonitor => Box::new(MonitorCapture),
        CaptureSource::Window { title } => Box::new(WindowCapture::new(title.clone())),
        CaptureSource::File { path } => Box::new(FileCapture::new(path)),
    }
}

pub fn build_recognizer(config: &OcrConfig) -> TesseractEngine {
    let mut engine = TesseractEngine::new(&config.tesseract_path)
        .with_timeout(Duration::from_millis(config.timeout_ms));

    if let Some(dir) = &config.tessdata_dir {
        engine = engine.with_tessdata_dir(dir);
    }
    if let Some(psm) = config.psm {
        engine = engine.with_psm(psm);
    }

    engine
}

/// `None` when translation is switched off; recognized text is still reported
pub fn build_translator(config: &TranslatorConfig) -> anyhow::Result<Option<Box<dyn Translator>>> {
    if !config.enabled {
        tracing::warn!("Translator disabled, reporting recognized text only");
        return Ok(None);
    }

    let translator: Box<dyn Translator> = match config.provider {
        TranslatorProvider::Google => Box::new(GoogleTranslator::new(config.api_url.clone())),
        TranslatorProvider::DeepL => {
            if config.api_key.is_empty() {
                bail!("DeepL requires translator.api_key or TRANSLATOR_API_KEY");
            }
            Box::new(DeepLTranslator::new(
                config.api_key.clone(),
                config.api_url.clone(),
            ))
        }
    };

    Ok(Some(translator))
}
