use chatlate_types::{ColorThreshold, Resolution, Roi};
use serde::{Deserialize, Serialize};

/// Where frames come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureSource {
    #[default]
    PrimaryMonitor,
    /// Case-insensitive partial title match
    Window { title: String },
    /// Saved screenshot, decoded on every capture
    File { path: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub source: CaptureSource,
    pub reference_resolution: Resolution,
    pub roi: Roi,
    pub threshold: ColorThreshold,
    /// Write every preprocessed crop here for inspection
    pub debug_image_path: Option<String>,
}
