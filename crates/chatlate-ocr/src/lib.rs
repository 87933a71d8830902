mod capture;
mod ocr;

pub use capture::{FileCapture, MonitorCapture, ScreenCapture, WindowCapture, list_windows};
pub use ocr::{TesseractEngine, TextRecognizer, encode_png};
