//! OCR Providers
//!
//! Defines the recognizer trait and the engines behind it. Every engine is
//! configured at construction; there is no process-wide OCR setting.

use std::io::Cursor;
use std::process::Command;

use image::GrayImage;

use super::types::{OcrEngine, OcrError, RecognizedText};
use crate::config::OcrConfig;

/// Text recognizer trait
pub trait TextRecognizer: Send + Sync {
    /// Get the engine type
    fn engine(&self) -> OcrEngine;

    /// Check if the engine can be invoked
    fn is_available(&self) -> bool;

    /// Run OCR over a normalized image. Blocks until the engine returns.
    fn recognize(&self, image: &GrayImage) -> Result<RecognizedText, OcrError>;
}

/// Encode a grayscale image as PNG for engines that take encoded input
pub(crate) fn encode_png(image: &GrayImage) -> Result<Vec<u8>, OcrError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .map_err(|e| OcrError::ImageEncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Tesseract run as an external executable
#[derive(Debug, Clone)]
pub struct TesseractCli {
    config: OcrConfig,
}

impl TesseractCli {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.tesseract_cmd);
        if let Some(dir) = &self.config.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }
}

impl TextRecognizer for TesseractCli {
    fn engine(&self) -> OcrEngine {
        OcrEngine::TesseractCli
    }

    fn is_available(&self) -> bool {
        Command::new(&self.config.tesseract_cmd)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, image: &GrayImage) -> Result<RecognizedText, OcrError> {
        let png = encode_png(image)?;

        let input_path =
            std::env::temp_dir().join(format!("ordersheet_{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&input_path, &png)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        // "stdout" as the output base makes tesseract print the text instead of writing a file
        let output = self
            .command()
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.languages)
            .arg("--oem")
            .arg(self.config.oem.to_string())
            .arg("--psm")
            .arg(self.config.psm.to_string())
            .output();

        let _ = std::fs::remove_file(&input_path);

        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::EngineUnavailable(format!(
                    "tesseract executable not found at {}",
                    self.config.tesseract_cmd.display()
                ))
            } else {
                OcrError::ProcessingError(format!("Failed to run tesseract: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| {
                OcrError::ProcessingError(format!("Tesseract output is not UTF-8: {}", e))
            })?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            chars = text.len(),
            "Tesseract recognition finished"
        );

        Ok(RecognizedText::new(text))
    }
}

/// Tesseract linked as a library
#[cfg(feature = "ocr-tesseract")]
#[derive(Debug, Clone)]
pub struct TesseractLib {
    config: OcrConfig,
}

#[cfg(feature = "ocr-tesseract")]
impl TesseractLib {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    fn init(&self) -> Result<tesseract::Tesseract, OcrError> {
        let datapath = self
            .config
            .tessdata_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        tesseract::Tesseract::new(datapath.as_deref(), Some(self.config.languages.as_str()))
            .map_err(|e| OcrError::EngineUnavailable(e.to_string()))
    }
}

#[cfg(feature = "ocr-tesseract")]
impl TextRecognizer for TesseractLib {
    fn engine(&self) -> OcrEngine {
        OcrEngine::TesseractLib
    }

    fn is_available(&self) -> bool {
        self.init().is_ok()
    }

    fn recognize(&self, image: &GrayImage) -> Result<RecognizedText, OcrError> {
        let png = encode_png(image)?;
        let mut tess = self
            .init()?
            .set_image_from_mem(&png)
            .map_err(|e| OcrError::ProcessingError(e.to_string()))?;
        let text = tess
            .get_text()
            .map_err(|e| OcrError::ProcessingError(e.to_string()))?;
        Ok(RecognizedText::new(text))
    }
}

/// Returns a preset text for every image.
///
/// Used to replay OCR output saved from an earlier run through the parser.
#[derive(Debug, Clone, Default)]
pub struct FixedTextRecognizer {
    text: RecognizedText,
}

impl FixedTextRecognizer {
    pub fn new(text: impl Into<RecognizedText>) -> Self {
        Self { text: text.into() }
    }
}

impl TextRecognizer for FixedTextRecognizer {
    fn engine(&self) -> OcrEngine {
        OcrEngine::Fixed
    }

    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, _image: &GrayImage) -> Result<RecognizedText, OcrError> {
        Ok(self.text.clone())
    }
}

/// Mock recognizer for testing
#[cfg(test)]
pub struct MockRecognizer {
    pub response: Result<String, String>,
    pub available: bool,
}

#[cfg(test)]
impl TextRecognizer for MockRecognizer {
    fn engine(&self) -> OcrEngine {
        OcrEngine::Fixed
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn recognize(&self, _image: &GrayImage) -> Result<RecognizedText, OcrError> {
        if !self.available {
            return Err(OcrError::EngineUnavailable("mock engine offline".to_string()));
        }
        self.response
            .clone()
            .map(RecognizedText::new)
            .map_err(OcrError::ProcessingError)
    }
}
