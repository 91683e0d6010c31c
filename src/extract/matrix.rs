//! Color/size matrix extraction
//!
//! Scans recognized text top to bottom, carrying one piece of state: the
//! color context set by the last header line (`BK (SN)`). Quantity lines
//! below a header become [`ColorSizeRecord`]s.
//!
//! A quantity line holds the total first, then one quantity per size:
//!
//! ```text
//! BK (SN)
//! 100 20 20 20 20 20
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{ColorContext, ColorSizeRecord};
use crate::ocr::RecognizedText;

/// Sizes printed on a standard sheet, left to right
pub const DEFAULT_SIZE_LABELS: [&str; 5] = ["230", "235", "240", "245", "250"];

static COLOR_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,3})\s*\(([A-Z]{1,2})\)").expect("static regex"));

static SIZE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(2[23][05]|2[45][05]|2[67][05])").expect("static regex"));

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").expect("static regex"));

/// What happens to the color context after a record is emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorContextPolicy {
    /// Keep the context; further quantity lines produce more records for the
    /// same color
    #[default]
    Carry,
    /// Drop the context so every record needs its own header
    ClearAfterRecord,
}

/// Which lines under a header are considered quantity lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuantityLineGate {
    /// A size token (`230`, `245`, ...) appears in the line, or the line is
    /// made of integers only
    #[default]
    SizeTokenOrNumericRow,
    /// A size token must appear in the line
    SizeTokenOnly,
}

impl QuantityLineGate {
    fn accepts(&self, line: &str) -> bool {
        if SIZE_TOKEN.is_match(line) {
            return true;
        }
        match self {
            Self::SizeTokenOnly => false,
            Self::SizeTokenOrNumericRow => is_numeric_row(line),
        }
    }
}

fn is_numeric_row(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|t| t.bytes().all(|b| b.is_ascii_digit()))
}

/// Assigns size labels to the per-size quantities of a line.
pub trait SizeLabelStrategy: Send + Sync {
    /// Number of per-size quantities a line must carry after the total
    fn label_count(&self) -> usize;

    /// Map `quantities` (total already removed) to size labels.
    /// `line` is the source line, for strategies that read sizes from it.
    fn resolve(&self, line: &str, quantities: &[u32]) -> BTreeMap<String, u32>;
}

/// Positional mapping onto a fixed label list.
///
/// The sizes actually printed on the line are ignored; the n-th quantity
/// always lands on the n-th label.
#[derive(Debug, Clone)]
pub struct FixedSizeLabels {
    labels: Vec<String>,
}

impl FixedSizeLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for FixedSizeLabels {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_LABELS)
    }
}

impl SizeLabelStrategy for FixedSizeLabels {
    fn label_count(&self) -> usize {
        self.labels.len()
    }

    fn resolve(&self, _line: &str, quantities: &[u32]) -> BTreeMap<String, u32> {
        self.labels
            .iter()
            .zip(quantities)
            .map(|(label, &qty)| (label.clone(), qty))
            .collect()
    }
}

/// Line-by-line color/size matrix extractor
pub struct MatrixExtractor {
    labels: Box<dyn SizeLabelStrategy>,
    policy: ColorContextPolicy,
    gate: QuantityLineGate,
}

impl Default for MatrixExtractor {
    fn default() -> Self {
        Self {
            labels: Box::new(FixedSizeLabels::default()),
            policy: ColorContextPolicy::default(),
            gate: QuantityLineGate::default(),
        }
    }
}

impl std::fmt::Debug for MatrixExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixExtractor")
            .field("label_count", &self.labels.label_count())
            .field("policy", &self.policy)
            .field("gate", &self.gate)
            .finish()
    }
}

impl MatrixExtractor {
    pub fn new(
        labels: Box<dyn SizeLabelStrategy>,
        policy: ColorContextPolicy,
        gate: QuantityLineGate,
    ) -> Self {
        Self {
            labels,
            policy,
            gate,
        }
    }

    pub fn with_labels(mut self, labels: Box<dyn SizeLabelStrategy>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_policy(mut self, policy: ColorContextPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_gate(mut self, gate: QuantityLineGate) -> Self {
        self.gate = gate;
        self
    }

    /// Minimum integer tokens for a quantity line: the total plus one per size
    pub fn min_tokens(&self) -> usize {
        1 + self.labels.label_count()
    }

    /// Extract every record from `text`, in the order the lines appear
    pub fn extract(&self, text: &RecognizedText) -> Vec<ColorSizeRecord> {
        let mut records = Vec::new();
        let mut context: Option<ColorContext> = None;

        for (index, line) in text.lines().enumerate() {
            if let Some(caps) = COLOR_HEADER.captures(line) {
                context = Some(ColorContext {
                    code: caps[1].to_string(),
                    kind: caps.get(2).map(|m| m.as_str().to_string()),
                });
                continue;
            }

            let Some(current) = context.as_ref() else {
                continue;
            };
            if !self.gate.accepts(line) {
                continue;
            }

            let tokens: Vec<&str> = INTEGER.find_iter(line).map(|m| m.as_str()).collect();
            if tokens.len() < self.min_tokens() {
                tracing::debug!(
                    line = index + 1,
                    found = tokens.len(),
                    needed = self.min_tokens(),
                    "Too few quantities, line skipped"
                );
                continue;
            }

            // Tokens past the mapped sizes are never read, so only these must fit
            let Some(numbers) = parse_quantities(&tokens[..self.min_tokens()]) else {
                tracing::debug!(line = index + 1, "Quantity out of range, line skipped");
                continue;
            };

            let size_matrix = self.labels.resolve(line, &numbers[1..]);
            let record = ColorSizeRecord::new(current, size_matrix, numbers[0]);
            tracing::debug!(
                line = index + 1,
                color = %record.color_code,
                total = record.total_quantity,
                "Color/size record extracted"
            );
            records.push(record);

            if self.policy == ColorContextPolicy::ClearAfterRecord {
                context = None;
            }
        }

        records
    }
}

/// `None` if a token does not fit a `u32`
fn parse_quantities(tokens: &[&str]) -> Option<Vec<u32>> {
    tokens.iter().map(|t| t.parse().ok()).collect()
}

/// Extract records with the default extractor
pub fn extract_color_size_matrix(text: impl Into<RecognizedText>) -> Vec<ColorSizeRecord> {
    MatrixExtractor::default().extract(&text.into())
}
