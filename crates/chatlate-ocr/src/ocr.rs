use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Output;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chatlate_core::{PipelineError, PreprocessedImage};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Turns a preprocessed crop into text
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in `image`; `language` is an engine language code such as "eng"
    async fn recognize(
        &self,
        image: &PreprocessedImage,
        language: &str,
    ) -> Result<String, PipelineError>;
}

/// Tesseract driven through its command line interface
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata_dir: Option<PathBuf>,
    psm: Option<u8>,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            tessdata_dir: None,
            psm: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = Some(psm);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the engine starts and has data for `language`, returns the version line
    pub async fn probe(&self, language: &str) -> Result<String, PipelineError> {
        self.probe_inner(language)
            .await
            .map_err(|e| PipelineError::Recognition(format!("{e:#}")))
    }

    async fn probe_inner(&self, language: &str) -> Result<String> {
        let output = self.run(&["--version"]).await?;
        let version = first_line(&output).unwrap_or_else(|| "tesseract (unknown version)".into());

        let mut args = vec!["--list-langs".to_string()];
        args.extend(self.tessdata_args());
        let output = self.run(&args).await?;
        let available = parse_language_list(&combined_output(&output));

        for code in language.split('+') {
            if !available.iter().any(|l| l == code) {
                bail!(
                    "No language data for '{}' (available: {})",
                    code,
                    available.join(", ")
                );
            }
        }

        Ok(version)
    }

    async fn recognize_png(&self, png: &[u8], language: &str) -> Result<String> {
        // Tesseract reads images from disk
        let input = NamedTempFile::with_suffix(".png").context("Failed to create temp file")?;
        std::fs::write(input.path(), png).context("Failed to write temp image")?;

        let mut args = vec![
            input.path().to_string_lossy().into_owned(),
            "stdout".to_string(),
            "-l".to_string(),
            language.to_string(),
        ];
        args.extend(self.tessdata_args());
        if let Some(psm) = self.psm {
            args.extend(["--psm".to_string(), psm.to_string()]);
        }

        let output = self.run(&args).await?;
        Ok(clean_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn tessdata_args(&self) -> Vec<String> {
        match &self.tessdata_dir {
            Some(dir) => vec![
                "--tessdata-dir".to_string(),
                dir.to_string_lossy().into_owned(),
            ],
            None => Vec::new(),
        }
    }

    async fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<Output> {
        let child = Command::new(&self.executable)
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| anyhow!("Tesseract timed out after {:?}", self.timeout))?
            .with_context(|| format!("Failed to start {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("Tesseract failed ({}): {}", output.status, stderr.trim());
        }

        Ok(output)
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl TextRecognizer for TesseractEngine {
    async fn recognize(
        &self,
        image: &PreprocessedImage,
        language: &str,
    ) -> Result<String, PipelineError> {
        let start = Instant::now();

        let text = async {
            let png = encode_png(image.as_rgba())?;
            self.recognize_png(&png, language).await
        }
        .await
        .map_err(|e| PipelineError::Recognition(format!("{e:#}")))?;

        tracing::debug!(
            "OCR took {:?}, {} chars recognized",
            start.elapsed(),
            text.chars().count()
        );
        Ok(text)
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .context("Failed to encode PNG")?;
    Ok(buffer)
}

/// Tesseract ends every page with a newline and a form feed
fn clean_output(raw: &str) -> String {
    raw.trim().to_string()
}

fn combined_output(output: &Output) -> String {
    // Older releases print the language list to stderr
    format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn first_line(output: &Output) -> Option<String> {
    combined_output(output)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn parse_language_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("List of available languages"))
        .filter(|l| !l.contains(' '))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_strips_page_break() {
        assert_eq!(clean_output("gg wp\n\u{c}"), "gg wp");
        assert_eq!(clean_output("\u{c}"), "");
        assert_eq!(clean_output("line one\nline two\n"), "line one\nline two");
    }

    #[test]
    fn test_parse_language_list() {
        let text = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\nrus\n";

        assert_eq!(parse_language_list(text), vec!["eng", "osd", "rus"]);
    }

    #[test]
    fn test_encode_png_signature() {
        let image = RgbaImage::new(4, 4);

        let png = encode_png(&image).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_missing_executable_is_recognition_error() {
        let engine = TesseractEngine::new("/nonexistent/tesseract-binary");

        let err = engine.probe("eng").await.unwrap_err();

        assert!(matches!(err, PipelineError::Recognition(_)));
    }
}
