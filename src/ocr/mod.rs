//! OCR Module
//!
//! Image normalization and text recognition for photographed work orders.
//!
//! Engines:
//! - Tesseract executable (default, no native linking)
//! - libtesseract through the `tesseract` crate (feature `ocr-tesseract`)
//! - Fixed text, for replaying saved OCR output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ordersheet_ocr::config::OcrConfig;
//! use ordersheet_ocr::ocr::{load_image, ImageNormalizer, TesseractCli, TextRecognizer};
//!
//! let image = load_image(path)?;
//! let gray = ImageNormalizer::default().normalize(image);
//! let text = TesseractCli::new(OcrConfig::default()).recognize(&gray)?;
//! ```

mod preprocess;
mod provider;
mod types;

pub use preprocess::{load_image, load_image_from_memory, ImageNormalizer, MAX_SCALE};
pub use provider::{FixedTextRecognizer, TesseractCli, TextRecognizer};
pub use types::{OcrEngine, OcrError, RecognizedText};

#[cfg(feature = "ocr-tesseract")]
pub use provider::TesseractLib;

#[cfg(test)]
pub(crate) use provider::MockRecognizer;
