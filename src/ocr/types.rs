//! OCR Types
//!
//! Defines the recognized-text value and error types shared by OCR engines.

use serde::{Deserialize, Serialize};

/// OCR engine type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    /// Tesseract command-line executable
    TesseractCli,
    /// libtesseract linked through the `tesseract` crate
    TesseractLib,
    /// Preset text, no image is read
    Fixed,
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::TesseractCli
    }
}

/// Raw text block returned by an OCR engine.
///
/// The text is kept exactly as the engine produced it. Lines are yielded in
/// top-to-bottom order, which the matrix extractor relies on because color
/// context carries forward from one line to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecognizedText(String);

impl RecognizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Newline-delimited lines, top to bottom
    pub fn lines(&self) -> std::str::Split<'_, char> {
        self.0.split('\n')
    }

    /// True when the engine returned nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for RecognizedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RecognizedText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl std::fmt::Display for RecognizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineUnavailable(String),

    #[error("Failed to prepare image for OCR: {0}")]
    ImageEncodeError(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),
}
