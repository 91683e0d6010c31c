//! Error types for the extraction pipeline

use thiserror::Error;

use crate::ocr::OcrError;

/// Pipeline-wide result type
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failures that stop one extraction call.
///
/// Finding no style number or no color/size records is not an error; those
/// produce an empty `ExtractedOrder`.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Image path unreadable or content undecodable
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// OCR engine unavailable or failed
    #[error("Text recognition failed: {0}")]
    Recognition(#[from] OcrError),

    /// Extraction exceeded the service timeout
    #[error("Extraction timed out after {0} seconds")]
    Timeout(u64),

    /// Blocking worker panicked or was cancelled
    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

impl ExtractError {
    /// Short message suitable for showing to the person who uploaded the sheet
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ImageLoad(_) => "could not read image",
            Self::Recognition(_) => "text recognition failed",
            Self::Timeout(_) => "text recognition took too long",
            Self::Worker(_) => "extraction failed unexpectedly",
        }
    }
}
