//! Total-quantity consistency checks
//!
//! Extraction keeps the printed total as-is. Callers that want to flag sheets
//! where the printed total disagrees with the per-size sum use this report
//! before saving.

use serde::Serialize;

use super::types::ExtractedOrder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalMismatch {
    /// Position in `order_details`
    pub index: usize,
    pub color_code: String,
    pub declared_total: u32,
    pub size_sum: u64,
}

impl std::fmt::Display for TotalMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {} ({}): printed total {} but sizes add up to {}",
            self.index, self.color_code, self.declared_total, self.size_sum
        )
    }
}

/// Every record whose printed total differs from its size sum
pub fn check_totals(order: &ExtractedOrder) -> Vec<TotalMismatch> {
    order
        .order_details
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.is_consistent())
        .map(|(index, record)| TotalMismatch {
            index,
            color_code: record.color_code.clone(),
            declared_total: record.total_quantity,
            size_sum: record.size_sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_order_text;

    #[test]
    fn test_reports_only_mismatched_records() {
        let order = parse_order_text("BK (SN)\n100 20 20 20 20 20\nWT (SN)\n61 12 12 12 12 12");

        let mismatches = check_totals(&order);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(
            mismatches[0],
            TotalMismatch {
                index: 1,
                color_code: "WT".to_string(),
                declared_total: 61,
                size_sum: 60,
            }
        );
        assert_eq!(
            mismatches[0].to_string(),
            "record 1 (WT): printed total 61 but sizes add up to 60"
        );
        // the order itself is left alone
        assert_eq!(order.order_details[1].total_quantity, 61);
    }

    #[test]
    fn test_empty_order_has_no_mismatches() {
        let order = parse_order_text("");
        assert!(check_totals(&order).is_empty());
    }
}
