//! Dispensary summary extraction: script statistics and revenue.

use rust_decimal::Decimal;

use crate::models::fields::DispensaryFields;
use crate::patterns::{REVENUE_PATTERNS, SCRIPT_TOTAL_PATTERNS};

use super::parse_amount;

/// Dispensary revenue is printed inclusive of VAT at the standard 15% rate.
fn vat_factor() -> Decimal {
    Decimal::new(115, 2)
}

pub fn extract(text: &str) -> DispensaryFields {
    let script_total = script_total(text);
    let turnover_incl_vat = first_revenue(text);

    let turnover_excl_vat = turnover_incl_vat.map(|incl| (incl / vat_factor()).round_dp(2));

    let avg_script_value = match (script_total, turnover_excl_vat) {
        (Some(scripts), Some(excl)) if scripts > 0 => {
            Some((excl / Decimal::from(scripts)).round_dp(2))
        }
        _ => None,
    };

    DispensaryFields {
        script_total,
        turnover_incl_vat,
        turnover_excl_vat,
        avg_script_value,
    }
}

fn script_total(text: &str) -> Option<i64> {
    for pattern in SCRIPT_TOTAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Ok(total) = caps[1].parse::<i64>() {
                return Some(total);
            }
        }
    }

    // Layout variant: the total is the last integer on the label's own line.
    for line in text.lines() {
        if line.contains("NUMBER OF DOCUMENTS - DISPENSED") {
            return line
                .split_whitespace()
                .rev()
                .find_map(|token| token.parse::<i64>().ok());
        }
    }

    None
}

fn first_revenue(text: &str) -> Option<Decimal> {
    for pattern in REVENUE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(value) = parse_amount(&caps[1]) {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Option<Decimal> {
        Decimal::from_str(s).ok()
    }

    #[test]
    fn test_script_total_and_revenue() {
        let text = "\
SCRIPT STATISTICS
TOTAL REVENUE 11,500.00
NUMBER OF DOCUMENTS - DISPENSED TOTAL 200
";
        let fields = extract(text);

        assert_eq!(fields.script_total, Some(200));
        assert_eq!(fields.turnover_incl_vat, dec("11500.00"));
        // 11,500.00 / 1.15
        assert_eq!(fields.turnover_excl_vat, dec("10000.00"));
        assert_eq!(fields.avg_script_value, dec("50.00"));
    }

    #[test]
    fn test_script_total_last_integer_fallback() {
        let text = "NUMBER OF DOCUMENTS - DISPENSED  DOCTOR 120  PAT/OTC 80  200\nmore text";
        assert_eq!(extract(text).script_total, Some(200));
    }

    #[test]
    fn test_zero_scripts_yields_null_average() {
        let text = "\
TOTAL REVENUE 500.00
NUMBER OF DOCUMENTS - DISPENSED TOTAL 0
";
        let fields = extract(text);

        assert_eq!(fields.script_total, Some(0));
        assert_eq!(fields.turnover_excl_vat, dec("434.78"));
        assert_eq!(fields.avg_script_value, None);
    }

    #[test]
    fn test_garbage_yields_all_null() {
        assert_eq!(extract("no dispensary content"), DispensaryFields::default());
    }
}
