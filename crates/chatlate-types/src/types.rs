use std::fmt;

use serde::{Deserialize, Serialize};

/// Events emitted by the pipeline loop towards the report sink
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Recognized {
        iteration: u64,
        text: String,
        elapsed_ms: u64,
    },
    Translated {
        iteration: u64,
        original: String,
        text: String,
        from_lang: String,
        to_lang: String,
        provider: String,
    },
    Stopped {
        reason: StopReason,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    Completed,
    Shutdown,
    Failed(String),
}

/// Screen resolution that ROI coordinates are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Region of interest in reference-resolution coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// True if the rectangle lies entirely inside a `bounds` sized bitmap
    pub fn fits_within(&self, bounds: Resolution) -> bool {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        self.width > 0
            && self.height > 0
            && right <= bounds.width as u64
            && bottom <= bounds.height as u64
    }
}

impl Default for Roi {
    /// Chat box of the default game skin at 1920x1080
    fn default() -> Self {
        Self {
            x: 660,
            y: 650,
            width: 550,
            height: 160,
        }
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Reference color plus a per-channel tolerance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorThreshold {
    pub reference: Rgb,
    pub offset: u8,
}

impl ColorThreshold {
    /// Every channel must be within `offset` of the reference, bounds inclusive
    pub fn matches(&self, pixel: Rgb) -> bool {
        within(self.reference.r, pixel.r, self.offset)
            && within(self.reference.g, pixel.g, self.offset)
            && within(self.reference.b, pixel.b, self.offset)
    }
}

impl Default for ColorThreshold {
    /// Chat font color
    fn default() -> Self {
        Self {
            reference: Rgb::new(239, 224, 192),
            offset: 65,
        }
    }
}

fn within(reference: u8, actual: u8, offset: u8) -> bool {
    reference.abs_diff(actual) <= offset
}
