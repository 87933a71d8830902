use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_report_recognized() -> bool {
    true
}

/// How iterations follow each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IterationMode {
    /// Stop after the first successful iteration
    Once,
    /// Start the next capture right away
    #[default]
    Continuous,
    /// Sleep between iterations
    Timed { delay_ms: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: IterationMode,
    /// Wait before the first capture
    pub startup_delay_ms: u64,
    /// Consecutive failed iterations tolerated before stopping
    pub max_retries: u32,
    /// Report recognized text even when it is not translated
    #[serde(default = "default_report_recognized")]
    pub report_recognized: bool,
}

impl PipelineConfig {
    pub fn startup_delay(&self) -> Option<Duration> {
        (self.startup_delay_ms > 0).then(|| Duration::from_millis(self.startup_delay_ms))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: IterationMode::default(),
            startup_delay_ms: 0,
            max_retries: 0,
            report_recognized: default_report_recognized(),
        }
    }
}
