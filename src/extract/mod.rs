//! Order Data Extraction
//!
//! Turns recognized work-order text into structured order data.
//!
//! - `style`: style number identification (ordered pattern list)
//! - `matrix`: per-color size/quantity records
//! - `consistency`: printed total vs. size sum report
//!
//! Finding nothing is not an error: a sheet with no style number and no
//! records yields an empty [`ExtractedOrder`].

pub mod consistency;
mod matrix;
mod style;
mod types;

pub use matrix::{
    extract_color_size_matrix, ColorContextPolicy, FixedSizeLabels, MatrixExtractor,
    QuantityLineGate, SizeLabelStrategy, DEFAULT_SIZE_LABELS,
};
pub use style::{identify_style_no, StyleIdentifier, StylePattern};
pub use types::{ColorContext, ColorSizeRecord, ExtractedOrder};

use crate::config::ExtractionConfig;
use crate::ocr::RecognizedText;

/// Bundle the stage outputs into one order. No cross-checking is done.
pub fn assemble_order(
    style_no: Option<String>,
    order_details: Vec<ColorSizeRecord>,
    raw_text: RecognizedText,
) -> ExtractedOrder {
    ExtractedOrder {
        style_no,
        order_details,
        raw_text,
    }
}

/// Style identifier and matrix extractor run over the same text
#[derive(Debug, Default)]
pub struct OrderParser {
    style: StyleIdentifier,
    matrix: MatrixExtractor,
}

impl OrderParser {
    pub fn new(style: StyleIdentifier, matrix: MatrixExtractor) -> Self {
        Self { style, matrix }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let matrix = MatrixExtractor::new(
            Box::new(FixedSizeLabels::new(config.size_labels.iter().cloned())),
            config.color_context,
            config.quantity_gate,
        );
        Self::new(StyleIdentifier::default(), matrix)
    }

    pub fn parse(&self, raw_text: RecognizedText) -> ExtractedOrder {
        let style_no = self.style.identify(raw_text.as_str());
        let order_details = self.matrix.extract(&raw_text);
        assemble_order(style_no, order_details, raw_text)
    }
}

/// Parse `text` with the default patterns and size labels
pub fn parse_order_text(text: impl Into<RecognizedText>) -> ExtractedOrder {
    OrderParser::default().parse(text.into())
}
