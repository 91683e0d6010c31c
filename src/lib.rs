//! Order Sheet OCR
//!
//! Reads photographed embroidery work orders and derives structured order
//! data: the style number and a per-color size/quantity matrix.
//!
//! # Modules
//!
//! - `ocr`: image normalization and text recognition engines
//! - `extract`: style number and color/size matrix parsing
//! - `pipeline`: the synchronous image → order call chain
//! - `service`: async wrapper running the pipeline on a blocking worker
//! - `config`: environment-driven configuration

pub mod config;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod pipeline;
pub mod service;

pub use config::Config;
pub use error::{ExtractError, Result};
pub use extract::{ColorSizeRecord, ExtractedOrder};
pub use pipeline::OrderSheetPipeline;
pub use service::OrderSheetService;
