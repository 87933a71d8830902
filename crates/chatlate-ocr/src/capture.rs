use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chatlate_core::{PipelineError, RawFrame};
use xcap::{Monitor, Window};

/// Source of raw frames for the pipeline
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    async fn capture(&self) -> Result<RawFrame, PipelineError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// The entire primary monitor
#[derive(Debug, Default, Clone)]
pub struct MonitorCapture;

#[async_trait]
impl ScreenCapture for MonitorCapture {
    async fn capture(&self) -> Result<RawFrame, PipelineError> {
        run_blocking(capture_primary_screen).await
    }

    fn describe(&self) -> String {
        "primary monitor".to_string()
    }
}

/// First visible window whose title contains `title`, ignoring case
#[derive(Debug, Clone)]
pub struct WindowCapture {
    title: String,
}

impl WindowCapture {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[async_trait]
impl ScreenCapture for WindowCapture {
    async fn capture(&self) -> Result<RawFrame, PipelineError> {
        let title = self.title.clone();
        run_blocking(move || capture_window_by_title(&title)).await
    }

    fn describe(&self) -> String {
        format!("window '{}'", self.title)
    }
}

/// Saved screenshot on disk, re-read on every capture
#[derive(Debug, Clone)]
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScreenCapture for FileCapture {
    async fn capture(&self) -> Result<RawFrame, PipelineError> {
        let path = self.path.clone();
        run_blocking(move || {
            let image = image::open(&path)
                .with_context(|| format!("Failed to decode {}", path.display()))?;
            Ok(RawFrame::from_rgba(image.into_rgba8()))
        })
        .await
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// List all visible windows with their titles
pub fn list_windows() -> Result<Vec<(u32, String)>> {
    let windows = Window::all().context("Failed to enumerate windows")?;
    Ok(windows
        .into_iter()
        .filter(|w| !w.title().is_empty() && !w.is_minimized())
        .map(|w| (w.id(), w.title().to_string()))
        .collect())
}

fn capture_window_by_title(title: &str) -> Result<RawFrame> {
    let needle = title.to_lowercase();
    let windows = Window::all().context("Failed to enumerate windows")?;
    let window = windows
        .into_iter()
        .filter(|w| !w.is_minimized())
        .find(|w| w.title().to_lowercase().contains(&needle))
        .with_context(|| format!("No window matching '{}'", title))?;

    let image = window.capture_image().context("Failed to capture window")?;
    Ok(RawFrame::new(image.width(), image.height(), image.into_raw()))
}

fn capture_primary_screen() -> Result<RawFrame> {
    let monitors = Monitor::all().context("Failed to get monitors")?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or(monitors.first())
        .context("No monitor found")?;

    let image = monitor.capture_image().context("Failed to capture screen")?;
    Ok(RawFrame::new(image.width(), image.height(), image.into_raw()))
}

/// xcap and image decoding block, keep them off the async workers
async fn run_blocking<F>(job: F) -> Result<RawFrame, PipelineError>
where
    F: FnOnce() -> Result<RawFrame> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(frame)) => Ok(frame),
        Ok(Err(e)) => Err(PipelineError::CaptureFormat(format!("{e:#}"))),
        Err(e) => Err(PipelineError::CaptureFormat(format!(
            "capture task failed: {e}"
        ))),
    }
}
