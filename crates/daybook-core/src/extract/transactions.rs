//! Transaction summary extraction from the invoicing audit trail.
//!
//! The total transaction count is the SUM over the fixed docket-type list;
//! each matching line contributes the first integer after its label.
//! Paid-out dockets are movement of cash, not sales, and are excluded.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::fields::TransactionFields;

/// Docket types that count as transactions, most specific label first so an
/// overlapping label ("RECEIPT COD" vs "RECEIPT", "SCRIPT REFUND" vs
/// "SCRIPT") never claims the wrong line.
const DOCKET_TYPES: [&str; 12] = [
    "RECEIPT COD",
    "SCRIPT REFUND",
    "CASH REFUND",
    "CREDIT NOTE",
    "C.O.D SALE",
    "CASH SALE",
    "MEDICAL AIDS",
    "LEVY DEBITS",
    "LEVY CREDITS",
    "RECEIPT",
    "INVOICE",
    "SCRIPT",
];

lazy_static! {
    static ref DOCKET_PATTERNS: Vec<(&'static str, Regex)> = DOCKET_TYPES
        .iter()
        .map(|label| {
            let pattern = format!(r"\b{}\b.*?(\d+)", regex::escape(label));
            (*label, Regex::new(&pattern).unwrap())
        })
        .collect();
}

pub fn extract(text: &str) -> TransactionFields {
    let mut fields = TransactionFields::default();

    for line in text.lines() {
        // The report title contains "INVOICE" as a prefix; skip it, along
        // with the excluded paid-out dockets.
        if line.contains("INVOICING AUDIT TRAIL") || line.contains("PAID OUT") {
            continue;
        }

        for (label, pattern) in DOCKET_PATTERNS.iter() {
            if !line.contains(label) {
                continue;
            }
            if let Some(caps) = pattern.captures(line) {
                if let Ok(count) = caps[1].parse::<i64>() {
                    fields.total += count;
                    *fields.breakdown.entry((*label).to_string()).or_insert(0) += count;
                }
            }
            break;
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = "\
INVOICING AUDIT TRAIL 2025/08/05
CASH SALE            120      13,450.00
C.O.D SALE             4         980.00
INVOICE               18       5,200.00
CASH REFUND            2         150.00
SCRIPT               210      31,000.00
SCRIPT REFUND          1          85.00
RECEIPT COD            3         420.00
RECEIPT               25       6,100.00
PAID OUT               5         600.00
";

    #[test]
    fn test_total_is_sum_over_docket_lines() {
        let fields = extract(REPORT);
        assert_eq!(fields.total, 120 + 4 + 18 + 2 + 210 + 1 + 3 + 25);
    }

    #[test]
    fn test_paid_out_is_excluded() {
        let fields = extract(REPORT);
        assert!(!fields.breakdown.contains_key("PAID OUT"));
    }

    #[test]
    fn test_specific_label_wins_over_prefix() {
        let fields = extract(REPORT);
        assert_eq!(fields.breakdown.get("SCRIPT REFUND"), Some(&1));
        assert_eq!(fields.breakdown.get("SCRIPT"), Some(&210));
        assert_eq!(fields.breakdown.get("RECEIPT COD"), Some(&3));
        assert_eq!(fields.breakdown.get("RECEIPT"), Some(&25));
    }

    #[test]
    fn test_title_line_does_not_count() {
        // "INVOICE" is a prefix of the report title; the title carries a
        // date that must not be counted.
        let fields = extract("INVOICING AUDIT TRAIL 2025/08/05\n");
        assert_eq!(fields.total, 0);
    }

    #[test]
    fn test_garbage_yields_zero_total() {
        let fields = extract("nothing here");
        assert_eq!(fields.total, 0);
        assert!(fields.breakdown.is_empty());
    }
}
