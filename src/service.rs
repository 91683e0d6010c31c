//! Order Sheet Service
//!
//! Async front for the blocking pipeline. Each extraction runs on tokio's
//! blocking pool so request handlers stay responsive, with an optional upper
//! bound on how long a caller waits for OCR.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::extract::ExtractedOrder;
use crate::pipeline::OrderSheetPipeline;

/// Shared handle around one pipeline
#[derive(Clone, Debug)]
pub struct OrderSheetService {
    pipeline: Arc<OrderSheetPipeline>,
    timeout: Option<Duration>,
}

impl OrderSheetService {
    pub fn new(pipeline: OrderSheetPipeline, timeout: Option<Duration>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            timeout,
        }
    }

    /// Create the service from configuration, using the Tesseract executable
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            OrderSheetPipeline::from_config(config),
            config.service.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn pipeline(&self) -> &OrderSheetPipeline {
        &self.pipeline
    }

    /// Whether the OCR engine can currently be invoked
    pub async fn engine_available(&self) -> bool {
        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.recognizer().is_available())
            .await
            .unwrap_or(false)
    }

    /// Extract an order from an image file
    pub async fn extract_path(&self, path: PathBuf) -> Result<ExtractedOrder> {
        let pipeline = Arc::clone(&self.pipeline);
        self.run(move || pipeline.extract_from_path(&path)).await
    }

    /// Extract an order from an uploaded image buffer
    pub async fn extract_bytes(&self, bytes: Vec<u8>) -> Result<ExtractedOrder> {
        let pipeline = Arc::clone(&self.pipeline);
        self.run(move || pipeline.extract_from_bytes(&bytes)).await
    }

    async fn run<F>(&self, job: F) -> Result<ExtractedOrder>
    where
        F: FnOnce() -> Result<ExtractedOrder> + Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(job);

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The blocking thread keeps running until OCR returns; only the
                    // caller stops waiting.
                    tracing::warn!(
                        timeout_secs = limit.as_secs(),
                        "Order sheet extraction timed out"
                    );
                    return Err(ExtractError::Timeout(limit.as_secs()));
                }
            },
            None => handle.await,
        };

        joined.map_err(|e| ExtractError::Worker(e.to_string()))?
    }
}
