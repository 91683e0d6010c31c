//! Order-sheet extraction pipeline
//!
//! image → normalized image → recognized text → `ExtractedOrder`
//!
//! Every call is synchronous and owns its own image, text and records. The
//! only slow step is OCR; the pipeline has no timeout of its own (see
//! [`crate::service::OrderSheetService`] for that).

use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;

use crate::config::Config;
use crate::error::Result;
use crate::extract::{ExtractedOrder, OrderParser};
use crate::ocr::{
    load_image, load_image_from_memory, ImageNormalizer, RecognizedText, TesseractCli,
    TextRecognizer,
};

pub struct OrderSheetPipeline {
    normalizer: ImageNormalizer,
    recognizer: Arc<dyn TextRecognizer>,
    parser: OrderParser,
}

impl OrderSheetPipeline {
    pub fn new(
        normalizer: ImageNormalizer,
        recognizer: Arc<dyn TextRecognizer>,
        parser: OrderParser,
    ) -> Self {
        Self {
            normalizer,
            recognizer,
            parser,
        }
    }

    /// Build a pipeline around the Tesseract executable described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::with_recognizer(config, Arc::new(TesseractCli::new(config.ocr.clone())))
    }

    /// Build a pipeline with a caller-supplied recognizer
    pub fn with_recognizer(config: &Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self::new(
            ImageNormalizer::new(config.preprocess.clone()),
            recognizer,
            OrderParser::from_config(&config.extraction),
        )
    }

    pub fn recognizer(&self) -> &dyn TextRecognizer {
        self.recognizer.as_ref()
    }

    /// Load, normalize, recognize and parse the image at `path`
    pub fn extract_from_path(&self, path: &Path) -> Result<ExtractedOrder> {
        tracing::info!(path = %path.display(), "Extracting order sheet");
        let image = load_image(path)?;
        self.extract_from_image(image)
    }

    /// Same as [`Self::extract_from_path`] for an encoded in-memory image
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<ExtractedOrder> {
        tracing::info!(bytes = bytes.len(), "Extracting order sheet from memory");
        let image = load_image_from_memory(bytes)?;
        self.extract_from_image(image)
    }

    pub fn extract_from_image(&self, image: DynamicImage) -> Result<ExtractedOrder> {
        let gray = self.normalizer.normalize(image);
        let text = self.recognizer.recognize(&gray)?;
        Ok(self.extract_from_text(text))
    }

    /// Parse already-recognized text
    pub fn extract_from_text(&self, text: RecognizedText) -> ExtractedOrder {
        if text.is_blank() {
            tracing::warn!(engine = ?self.recognizer.engine(), "OCR returned no text");
        }

        let order = self.parser.parse(text);
        tracing::info!(
            style_no = order.style_no.as_deref().unwrap_or("-"),
            records = order.order_details.len(),
            "Order sheet extracted"
        );
        order
    }
}

impl std::fmt::Debug for OrderSheetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSheetPipeline")
            .field("normalizer", &self.normalizer)
            .field("engine", &self.recognizer.engine())
            .field("parser", &self.parser)
            .finish()
    }
}
