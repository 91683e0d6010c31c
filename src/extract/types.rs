//! Extraction Types
//!
//! Structured order data derived from a work-order sheet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ocr::RecognizedText;

/// Color code and optional type qualifier taken from a header line such as `BK (SN)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorContext {
    pub code: String,
    pub kind: Option<String>,
}

/// Per-color quantity breakdown across garment sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSizeRecord {
    pub color_code: String,
    /// Mirrors `color_code`; sheets carry no separate color name
    pub color_name: String,
    pub color_type: Option<String>,
    /// Size label to quantity
    pub size_matrix: BTreeMap<String, u32>,
    /// Total as printed on the sheet, not recomputed
    pub total_quantity: u32,
}

impl ColorSizeRecord {
    pub fn new(
        context: &ColorContext,
        size_matrix: BTreeMap<String, u32>,
        total_quantity: u32,
    ) -> Self {
        Self {
            color_code: context.code.clone(),
            color_name: context.code.clone(),
            color_type: context.kind.clone(),
            size_matrix,
            total_quantity,
        }
    }

    /// Sum of the per-size quantities
    pub fn size_sum(&self) -> u64 {
        self.size_matrix.values().map(|&q| u64::from(q)).sum()
    }

    /// True when the printed total matches the per-size sum
    pub fn is_consistent(&self) -> bool {
        u64::from(self.total_quantity) == self.size_sum()
    }

    /// Copy of this record with `total_quantity` replaced by the per-size sum,
    /// saturating at `u32::MAX`.
    ///
    /// This is the correction the order-creation path applies before saving
    /// details; extraction itself never calls it.
    pub fn with_recomputed_total(&self) -> Self {
        let total = u32::try_from(self.size_sum()).unwrap_or(u32::MAX);
        Self {
            total_quantity: total,
            ..self.clone()
        }
    }
}

/// Result of one extraction call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedOrder {
    pub style_no: Option<String>,
    pub order_details: Vec<ColorSizeRecord>,
    /// Full OCR output, kept for audit and debugging
    pub raw_text: RecognizedText,
}

impl ExtractedOrder {
    /// No style number and no records were found
    pub fn is_empty(&self) -> bool {
        self.style_no.is_none() && self.order_details.is_empty()
    }

    /// Sum of the printed totals of every record
    pub fn declared_total(&self) -> u64 {
        self.order_details
            .iter()
            .map(|d| u64::from(d.total_quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total: u32, quantities: &[(&str, u32)]) -> ColorSizeRecord {
        let context = ColorContext {
            code: "NV".to_string(),
            kind: Some("SN".to_string()),
        };
        let matrix = quantities
            .iter()
            .map(|(size, qty)| (size.to_string(), *qty))
            .collect();
        ColorSizeRecord::new(&context, matrix, total)
    }

    #[test]
    fn test_record_mirrors_code_into_name() {
        let rec = record(10, &[("230", 10)]);
        assert_eq!(rec.color_code, "NV");
        assert_eq!(rec.color_name, "NV");
        assert_eq!(rec.color_type.as_deref(), Some("SN"));
    }

    #[test]
    fn test_consistency_and_recompute() {
        let good = record(30, &[("230", 10), ("235", 20)]);
        assert!(good.is_consistent());

        let bad = record(31, &[("230", 10), ("235", 20)]);
        assert!(!bad.is_consistent());
        let fixed = bad.with_recomputed_total();
        assert_eq!(fixed.total_quantity, 30);
        assert_eq!(fixed.size_matrix, bad.size_matrix);
        // the original stays untouched
        assert_eq!(bad.total_quantity, 31);
    }

    #[test]
    fn test_recompute_saturates() {
        let rec = record(0, &[("230", u32::MAX), ("235", 5)]);
        assert_eq!(rec.with_recomputed_total().total_quantity, u32::MAX);
    }

    #[test]
    fn test_order_json_shape() {
        let order = ExtractedOrder {
            style_no: None,
            order_details: vec![record(20, &[("230", 20)])],
            raw_text: RecognizedText::new("NV (SN)\n20 20"),
        };
        let value = serde_json::to_value(&order).unwrap();
        assert!(value["style_no"].is_null());
        assert_eq!(value["raw_text"], "NV (SN)\n20 20");
        let detail = &value["order_details"][0];
        assert_eq!(detail["color_code"], "NV");
        assert_eq!(detail["color_name"], "NV");
        assert_eq!(detail["color_type"], "SN");
        assert_eq!(detail["size_matrix"]["230"], 20);
        assert_eq!(detail["total_quantity"], 20);
    }

    #[test]
    fn test_declared_total_and_empty() {
        let empty = ExtractedOrder {
            style_no: None,
            order_details: Vec::new(),
            raw_text: RecognizedText::default(),
        };
        assert!(empty.is_empty());
        assert_eq!(empty.declared_total(), 0);

        let order = ExtractedOrder {
            style_no: None,
            order_details: vec![record(20, &[]), record(u32::MAX, &[])],
            raw_text: RecognizedText::default(),
        };
        assert!(!order.is_empty());
        assert_eq!(order.declared_total(), 20 + u64::from(u32::MAX));
    }
}
