//! Image loading and normalization before OCR

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageReader};

use crate::config::PreprocessConfig;
use crate::error::{ExtractError, Result};

/// Decode an image file; the format is guessed from its content
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| ExtractError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    reader
        .decode()
        .map_err(|e| ExtractError::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// Decode an in-memory image buffer
pub fn load_image_from_memory(bytes: &[u8]) -> Result<DynamicImage> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))?
        .decode()
        .map_err(|e| ExtractError::ImageLoad(e.to_string()))
}

/// Largest resize factor the normalizer applies
pub const MAX_SCALE: f32 = 4.0;

/// Upper bound for either side of a resized image
const MAX_DIMENSION: u32 = 20_000;

/// Grayscale conversion plus optional resize and contrast steps.
///
/// Both optional steps are off unless configured, in which case the output
/// has the input's dimensions.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    options: PreprocessConfig,
}

impl ImageNormalizer {
    pub fn new(options: PreprocessConfig) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PreprocessConfig {
        &self.options
    }

    pub fn normalize(&self, image: DynamicImage) -> GrayImage {
        let mut gray = match image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        };

        if let Some(factor) = self.options.scale.filter(|f| f.is_finite() && *f > 0.0) {
            let factor = factor.min(MAX_SCALE);
            let width = scaled_side(gray.width(), factor);
            let height = scaled_side(gray.height(), factor);
            if (width, height) != gray.dimensions() {
                gray = image::imageops::resize(&gray, width, height, FilterType::Lanczos3);
            }
        }

        if let Some(contrast) = self.options.contrast {
            gray = image::imageops::contrast(&gray, contrast);
        }

        gray
    }
}

fn scaled_side(side: u32, factor: f32) -> u32 {
    ((side as f32) * factor).round().clamp(1.0, MAX_DIMENSION as f32) as u32
}
