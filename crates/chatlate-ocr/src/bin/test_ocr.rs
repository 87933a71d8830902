//! One pass of capture, preprocess and OCR, printed for inspection.
//! Run with: cargo run -p chatlate-ocr --bin test_ocr [image.png]

use std::time::{Duration, Instant};

use anyhow::Result;
use chatlate_config::Config;
use chatlate_ocr::{FileCapture, MonitorCapture, ScreenCapture, TesseractEngine, TextRecognizer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("chatlate_ocr=debug,test_ocr=debug")
        .with_target(false)
        .init();

    let config = Config::new();
    let capture: Box<dyn ScreenCapture> = match std::env::args().nth(1) {
        Some(path) => Box::new(FileCapture::new(path)),
        None => Box::new(MonitorCapture),
    };

    tracing::info!("1. Available windows:");
    match chatlate_ocr::list_windows() {
        Ok(windows) => {
            for (id, title) in windows.iter().take(10) {
                tracing::info!("   {} - {}", id, title);
            }
        }
        Err(e) => tracing::warn!("   Failed: {:#}", e),
    }

    tracing::info!("2. Capturing {}...", capture.describe());
    let start = Instant::now();
    let frame = capture.capture().await?;
    tracing::info!(
        "   {}x{} in {:?}",
        frame.width,
        frame.height,
        start.elapsed()
    );

    let capture_config = &config.capture;
    let image = chatlate_core::preprocess(
        frame,
        capture_config.reference_resolution,
        capture_config.roi,
        &capture_config.threshold,
    )?;
    image.as_rgba().save("test_capture.png")?;
    tracing::info!("3. Preprocessed crop saved to test_capture.png");

    let mut engine = TesseractEngine::new(&config.ocr.tesseract_path)
        .with_timeout(Duration::from_millis(config.ocr.timeout_ms));
    if let Some(dir) = &config.ocr.tessdata_dir {
        engine = engine.with_tessdata_dir(dir);
    }
    if let Some(psm) = config.ocr.psm {
        engine = engine.with_psm(psm);
    }

    let version = engine.probe(&config.ocr.language).await?;
    tracing::info!("4. Running OCR ({}, {})...", config.ocr.language, version);
    let start = Instant::now();
    let text = engine.recognize(&image, &config.ocr.language).await?;
    tracing::info!("   {:?} - {} chars", start.elapsed(), text.len());
    for line in text.lines().take(5) {
        tracing::info!("   > {}", line);
    }

    Ok(())
}
