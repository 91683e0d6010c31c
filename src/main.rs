//! Order sheet extraction diagnostic tool
//!
//! Runs the extraction pipeline on one work-order image (or on OCR text saved
//! from an earlier run) and prints what was found.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ordersheet_ocr::extract::consistency::check_totals;
use ordersheet_ocr::ocr::{FixedTextRecognizer, RecognizedText, TextRecognizer};
use ordersheet_ocr::{Config, ExtractedOrder, OrderSheetPipeline};

#[derive(Parser, Debug)]
#[command(
    name = "ordersheet-extract",
    version,
    about = "Extract style number and color/size quantities from a work-order sheet"
)]
struct Cli {
    /// Work-order image to read
    #[arg(required_unless_present = "text_file", conflicts_with = "text_file")]
    image: Option<PathBuf>,

    /// Parse previously recognized text instead of running OCR
    #[arg(long, value_name = "FILE")]
    text_file: Option<PathBuf>,

    /// Output machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Report records whose printed total differs from the size sum
    #[arg(long)]
    check_totals: bool,

    /// Echo the raw recognized text
    #[arg(long)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ordersheet_ocr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env().context("invalid configuration")?;

    let order = match (&cli.text_file, &cli.image) {
        (Some(text_file), _) => {
            let text = std::fs::read_to_string(text_file)
                .with_context(|| format!("failed to read {}", text_file.display()))?;
            let recognizer: Arc<dyn TextRecognizer> = Arc::new(FixedTextRecognizer::default());
            OrderSheetPipeline::with_recognizer(&config, recognizer)
                .extract_from_text(RecognizedText::new(text))
        }
        (None, Some(image)) => {
            tracing::info!(
                engine = %config.ocr.tesseract_cmd.display(),
                languages = %config.ocr.languages,
                "Using tesseract"
            );
            OrderSheetPipeline::from_config(&config)
                .extract_from_path(image)
                .map_err(|e| anyhow::anyhow!("{}: {}", e.user_message(), e))?
        }
        (None, None) => anyhow::bail!("an image path or --text-file is required"),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        print_summary(&order, cli.raw);
    }

    if cli.check_totals {
        for mismatch in check_totals(&order) {
            eprintln!("warning: {}", mismatch);
        }
    }

    Ok(())
}

fn print_summary(order: &ExtractedOrder, raw: bool) {
    println!("Style no: {}", order.style_no.as_deref().unwrap_or("(not found)"));
    println!("Order details: {}", order.order_details.len());
    for detail in &order.order_details {
        println!(
            "  Color: {} ({})",
            detail.color_code,
            detail.color_type.as_deref().unwrap_or("-")
        );
        println!("  Total: {}", detail.total_quantity);
        let sizes: Vec<String> = detail
            .size_matrix
            .iter()
            .map(|(size, qty)| format!("{}={}", size, qty))
            .collect();
        println!("  Sizes: {}", sizes.join(" "));
        println!();
    }
    if order.is_empty() {
        println!("Nothing recognized; review the sheet manually.");
    }
    if raw {
        println!("Raw text:");
        println!("{}", order.raw_text);
    }
}
