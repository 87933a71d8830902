pub mod change;
pub mod error;
pub mod preprocess;
pub mod state;
pub mod types;

pub use change::should_translate;
pub use error::PipelineError;
pub use preprocess::{PixelClass, classify, preprocess};
pub use state::PipelineState;
pub use types::{PreprocessedImage, RawFrame, RecognizedText};
