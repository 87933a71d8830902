use chatlate_types::{Resolution, Roi};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Capture format error: {0}")]
    CaptureFormat(String),

    #[error("Region {roi} is out of bounds for a {bounds} frame")]
    RegionOutOfBounds { roi: Roi, bounds: Resolution },

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Refusing to translate empty input")]
    EmptyInput,
}

impl PipelineError {
    /// Configuration errors fail identically on every attempt
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PipelineError::RegionOutOfBounds { .. })
    }
}
