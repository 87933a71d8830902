use image::RgbaImage;

/// One captured screen frame as raw RGBA8
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RawFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
        }
    }
}

/// Binarized crop: every pixel is opaque white (text) or opaque black
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedImage {
    image: RgbaImage,
}

impl PreprocessedImage {
    pub(crate) fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// OCR output tagged with the iteration that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedText {
    text: String,
    iteration: u64,
}

impl RecognizedText {
    pub fn new(text: impl Into<String>, iteration: u64) -> Self {
        Self {
            text: text.into(),
            iteration,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
