use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use chatlate_config::Config;
use chatlate_config::pipeline::IterationMode;
use chatlate_core::{PipelineError, PipelineState, PreprocessedImage, RecognizedText};
use chatlate_ocr::{ScreenCapture, TextRecognizer};
use chatlate_translator::{TranslateError, Translator};
use chatlate_types::{ColorThreshold, PipelineEvent, Resolution, Roi, StopReason};
use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

use crate::status::LoopStatus;

/// Everything the loop needs from the configuration
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub reference_resolution: Resolution,
    pub roi: Roi,
    pub threshold: ColorThreshold,
    pub source_language: String,
    pub target_language: String,
    pub mode: IterationMode,
    pub startup_delay: Option<Duration>,
    pub max_retries: u32,
    pub report_recognized: bool,
    pub debug_image_path: Option<PathBuf>,
}

impl LoopSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            reference_resolution: config.capture.reference_resolution,
            roi: config.capture.roi,
            threshold: config.capture.threshold,
            source_language: config.ocr.language.clone(),
            target_language: config.translator.to_lang.clone(),
            mode: config.pipeline.mode,
            startup_delay: config.pipeline.startup_delay(),
            max_retries: config.pipeline.max_retries,
            report_recognized: config.pipeline.report_recognized,
            debug_image_path: config.capture.debug_image_path.as_ref().map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Capturing,
    Preprocessing,
    Recognizing,
    Deciding,
    Translating,
    Reporting,
    Stopped,
}

/// Drives capture -> preprocess -> recognize -> translate, one iteration at a time
pub struct LoopController {
    capture: Box<dyn ScreenCapture>,
    recognizer: Box<dyn TextRecognizer>,
    translator: Option<Box<dyn Translator>>,
    settings: LoopSettings,
    state: PipelineState,
    phase: LoopPhase,
    status: LoopStatus,
    report_tx: AsyncSender<PipelineEvent>,
}

impl LoopController {
    pub fn new(
        capture: Box<dyn ScreenCapture>,
        recognizer: Box<dyn TextRecognizer>,
        translator: Option<Box<dyn Translator>>,
        settings: LoopSettings,
        report_tx: AsyncSender<PipelineEvent>,
    ) -> Self {
        Self {
            capture,
            recognizer,
            translator,
            settings,
            state: PipelineState::new(),
            phase: LoopPhase::Idle,
            status: LoopStatus::default(),
            report_tx,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn status(&self) -> &LoopStatus {
        &self.status
    }

    #[cfg(test)]
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Run until the configured mode completes, `cancel` fires between
    /// iterations, or an iteration fails past the retry budget.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), PipelineError> {
        tracing::info!(
            "[LOOP] Starting: {} -> {}, mode {:?}",
            self.settings.source_language,
            self.settings.target_language,
            self.settings.mode
        );

        if let Some(delay) = self.settings.startup_delay {
            tracing::info!("[LOOP] Waiting {:?} before first capture", delay);
            if !pause(delay, &cancel).await {
                self.stop(StopReason::Shutdown).await;
                return Ok(());
            }
        }

        let mut consecutive_failures = 0u32;

        loop {
            if cancel.is_cancelled() {
                self.stop(StopReason::Shutdown).await;
                return Ok(());
            }

            match self.run_iteration().await {
                Ok(()) => {
                    consecutive_failures = 0;
                    if self.settings.mode == IterationMode::Once {
                        self.stop(StopReason::Completed).await;
                        return Ok(());
                    }
                }
                Err(e) => {
                    self.status.failures += 1;
                    consecutive_failures += 1;

                    if !e.is_retryable() || consecutive_failures > self.settings.max_retries {
                        tracing::error!(
                            "[LOOP] Iteration {} failed: {}",
                            self.status.iterations,
                            e
                        );
                        self.stop(StopReason::Failed(e.to_string())).await;
                        return Err(e);
                    }

                    tracing::warn!(
                        "[LOOP] Iteration {} failed, retrying ({}/{}): {}",
                        self.status.iterations,
                        consecutive_failures,
                        self.settings.max_retries,
                        e
                    );
                    self.phase = LoopPhase::Idle;
                }
            }

            match self.settings.mode {
                IterationMode::Once | IterationMode::Continuous => tokio::task::yield_now().await,
                IterationMode::Timed { delay_ms } => {
                    if !pause(Duration::from_millis(delay_ms), &cancel).await {
                        self.stop(StopReason::Shutdown).await;
                        return Ok(());
                    }
                }
            }
        }
    }

    /// One full pass; `PipelineState` only moves forward when every step succeeded
    pub async fn run_iteration(&mut self) -> Result<(), PipelineError> {
        self.status.iterations += 1;
        let iteration = self.status.iterations;

        self.phase = LoopPhase::Capturing;
        let frame = self.capture.capture().await?;
        self.status.last_capture_time = Some(SystemTime::now());

        self.phase = LoopPhase::Preprocessing;
        let image = chatlate_core::preprocess(
            frame,
            self.settings.reference_resolution,
            self.settings.roi,
            &self.settings.threshold,
        )?;
        self.write_debug_image(&image);

        self.phase = LoopPhase::Recognizing;
        let start = Instant::now();
        let text = self
            .recognizer
            .recognize(&image, &self.settings.source_language)
            .await?;
        let elapsed = start.elapsed();
        let current = RecognizedText::new(text, iteration);

        self.phase = LoopPhase::Deciding;
        let translate =
            chatlate_core::should_translate(current.text(), self.state.previous().text());

        let mut events = Vec::new();
        if self.settings.report_recognized && translate {
            events.push(PipelineEvent::Recognized {
                iteration,
                text: current.text().to_string(),
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }

        let translator = self.translator.as_ref().filter(|_| translate);
        if let Some(translator) = translator {
            self.phase = LoopPhase::Translating;
            let translation = translator
                .translate(current.text(), &self.settings.target_language)
                .await
                .map_err(translation_error)?;
            self.status.translations += 1;

            events.push(PipelineEvent::Translated {
                iteration,
                original: current.text().to_string(),
                text: translation.text,
                from_lang: translation.from,
                to_lang: translation.to,
                provider: translation.provider,
            });
        } else if !translate {
            tracing::trace!("[LOOP] Iteration {} unchanged, nothing to translate", iteration);
        }

        self.phase = LoopPhase::Reporting;
        for event in events {
            self.report(event).await;
        }

        self.state.advance(current);
        self.phase = LoopPhase::Idle;
        Ok(())
    }

    async fn stop(&mut self, reason: StopReason) {
        self.phase = LoopPhase::Stopped;
        tracing::info!("[LOOP] Stopped ({:?}): {}", reason, self.status);
        if let Some(at) = self.status.last_capture_time {
            tracing::debug!("[LOOP] Last capture at {:?}", at);
        }
        self.report(PipelineEvent::Stopped { reason }).await;
    }

    async fn report(&self, event: PipelineEvent) {
        if let Err(e) = self.report_tx.send(event).await {
            tracing::warn!("Report sink closed: {}", e);
        }
    }

    fn write_debug_image(&self, image: &PreprocessedImage) {
        let Some(path) = &self.settings.debug_image_path else {
            return;
        };

        if let Err(e) = image.as_rgba().save(path) {
            tracing::warn!("Failed to write debug image {}: {}", path.display(), e);
        }
    }
}

fn translation_error(e: TranslateError) -> PipelineError {
    match e {
        TranslateError::EmptyInput => PipelineError::EmptyInput,
        other => PipelineError::Translation(other.to_string()),
    }
}

/// Sleep unless cancelled first; false means shutdown was requested
async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = cancel.cancelled() => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_errors_map_to_pipeline_errors() {
        assert!(matches!(
            translation_error(TranslateError::EmptyInput),
            PipelineError::EmptyInput
        ));
        assert!(matches!(
            translation_error(TranslateError::RateLimitExceeded),
            PipelineError::Translation(_)
        ));
    }

    #[test]
    fn test_settings_follow_config() {
        let mut config = Config::default();
        config.pipeline.startup_delay_ms = 1500;
        config.capture.debug_image_path = Some("done.png".to_string());

        let settings = LoopSettings::from_config(&config);

        assert_eq!(settings.startup_delay, Some(Duration::from_millis(1500)));
        assert_eq!(settings.debug_image_path, Some(PathBuf::from("done.png")));
        assert_eq!(settings.source_language, "eng");
        assert_eq!(settings.target_language, "en");
    }

    #[tokio::test]
    async fn test_pause_returns_false_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(!pause(Duration::from_secs(60), &cancel).await);
        assert!(pause(Duration::from_millis(1), &CancellationToken::new()).await);
    }
}
