//! Gross profit report extraction: a tabular per-product listing.
//!
//! Header, footer, and subtotal lines are filtered out by keyword denylist
//! and a minimum-length heuristic before the fixed-width row patterns run.
//! Summary totals are derived by summation over the accepted rows.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::departments::DepartmentCatalog;
use crate::models::fields::{GrossProfitFields, GrossProfitTotals, SalesLine};
use crate::patterns::{GP_ROW_FULL, GP_ROW_SHORT};

/// Keywords that mark page headers and column headings.
const HEADER_KEYWORDS: [&str; 14] = [
    "REITZ APTEEK",
    "TLC PHARMACY",
    "WINTERTON",
    "PAGE:",
    "CODE",
    "DESCRIPTION",
    "ON HAND",
    "SALES",
    "COST",
    "GROSS",
    "TURNOVER",
    "GP%",
    "QTY",
    "VALUE",
];

/// Keywords that mark subtotal and separator blocks.
const EXCLUSION_KEYWORDS: [&str; 6] = ["MAIN-DEPT", "SUB-DEPT", "TOTAL", "-------", "===", "***"];

/// Anything shorter cannot hold a full data row.
const MIN_DATA_LINE_LEN: usize = 20;

pub fn extract(text: &str, catalog: Option<&DepartmentCatalog>) -> GrossProfitFields {
    let mut lines = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.len() < MIN_DATA_LINE_LEN {
            continue;
        }
        if HEADER_KEYWORDS.iter().any(|kw| line.contains(kw)) {
            continue;
        }
        if EXCLUSION_KEYWORDS.iter().any(|kw| line.contains(kw)) {
            continue;
        }
        if line.chars().all(|c| matches!(c, '-' | ' ' | '=' | '*')) {
            continue;
        }

        if let Some(sale) = parse_row(line, catalog) {
            lines.push(sale);
        }
    }

    let totals = sum_lines(&lines);
    GrossProfitFields { lines, totals }
}

fn parse_row(line: &str, catalog: Option<&DepartmentCatalog>) -> Option<SalesLine> {
    if let Some(caps) = GP_ROW_FULL.captures(line) {
        return build_line(
            &caps[1],
            &caps[2],
            &caps[3],
            &caps[4],
            &caps[5],
            &caps[6],
            &caps[7],
            &caps[8],
            Some(&caps[9]),
            &caps[10],
            catalog,
        );
    }

    if let Some(caps) = GP_ROW_SHORT.captures(line) {
        return build_line(
            &caps[1],
            &caps[2],
            &caps[3],
            &caps[4],
            &caps[5],
            &caps[6],
            &caps[7],
            &caps[8],
            None,
            &caps[9],
            catalog,
        );
    }

    None
}

#[allow(clippy::too_many_arguments)]
fn build_line(
    dept: &str,
    stock_code: &str,
    description: &str,
    on_hand: &str,
    sales_qty: &str,
    sales_value: &str,
    sales_cost: &str,
    gross_profit: &str,
    turnover_percent: Option<&str>,
    gp_percent: &str,
    catalog: Option<&DepartmentCatalog>,
) -> Option<SalesLine> {
    // Detailed codes map onto the coarser 4-character department taxonomy:
    // BAAC01 -> BAAC.
    let source_code = dept.trim().to_string();
    let department_code = source_code.chars().take(4).collect::<String>();
    let department_label = catalog
        .and_then(|c| c.label(&department_code))
        .map(str::to_string);

    Some(SalesLine {
        department_label,
        department_code,
        source_department_code: source_code,
        stock_code: stock_code.trim().to_string(),
        description: description.trim().to_string(),
        on_hand: Decimal::from_str(on_hand).ok()?,
        sales_qty: Decimal::from_str(sales_qty).ok()?,
        sales_value: Decimal::from_str(sales_value).ok()?,
        sales_cost: Decimal::from_str(sales_cost).ok()?,
        gross_profit: Decimal::from_str(gross_profit).ok()?,
        turnover_percent: turnover_percent.and_then(|v| Decimal::from_str(v).ok()),
        gp_percent: Decimal::from_str(gp_percent).ok()?,
    })
}

fn sum_lines(lines: &[SalesLine]) -> GrossProfitTotals {
    let mut totals = GrossProfitTotals {
        records: lines.len(),
        ..GrossProfitTotals::default()
    };

    for line in lines {
        totals.sales_value += line.sales_value;
        totals.sales_cost += line.sales_cost;
        totals.sales_qty += line.sales_qty;
        totals.on_hand += line.on_hand;
        totals.gross_profit += line.gross_profit;
    }

    if totals.sales_value > Decimal::ZERO {
        totals.gp_percent =
            (totals.gross_profit / totals.sales_value * Decimal::ONE_HUNDRED).round_dp(2);
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_short_row() {
        let fields = extract(
            "BAAC01 ST1234 PANADO 500MG 100.000 15.000 45.50 35.00 10.50 23.08",
            None,
        );

        assert_eq!(fields.lines.len(), 1);
        let line = &fields.lines[0];
        assert_eq!(line.department_code, "BAAC");
        assert_eq!(line.source_department_code, "BAAC01");
        assert_eq!(line.stock_code, "ST1234");
        assert_eq!(line.description, "PANADO 500MG");
        assert_eq!(line.sales_qty, dec("15.000"));
        assert_eq!(line.gross_profit, dec("10.50"));
        assert_eq!(line.gp_percent, dec("23.08"));
        assert_eq!(line.turnover_percent, None);
    }

    #[test]
    fn test_parse_full_row_with_turnover_percent() {
        let fields = extract(
            "BBBO02 XK9100 ALLERGEX TABS 30 55.000 4.000 120.00 80.00 40.00 1.250 33.333",
            None,
        );

        assert_eq!(fields.lines.len(), 1);
        let line = &fields.lines[0];
        assert_eq!(line.department_code, "BBBO");
        assert_eq!(line.turnover_percent, Some(dec("1.250")));
        assert_eq!(line.gp_percent, dec("33.333"));
    }

    #[test]
    fn test_headers_and_subtotals_are_filtered() {
        let report = "\
REITZ APTEEK GROSS PROFIT REPORT     PAGE: 1
CODE   DESCRIPTION            ON HAND   SALES QTY
-------------------------------------------------
BAAC01 ST1234 PANADO 500MG 100.000 15.000 45.50 35.00 10.50 23.08
MAIN-DEPT BAAC SUBTOTAL 45.50 35.00 10.50
*** TOTAL 45.50 35.00 10.50
";
        let fields = extract(report, None);
        assert_eq!(fields.lines.len(), 1);
        assert_eq!(fields.totals.records, 1);
    }

    #[test]
    fn test_totals_are_summed_over_rows() {
        let report = "\
BAAC01 ST1234 PANADO 500MG 100.000 15.000 45.50 35.00 10.50 23.08
BAAF03 ST9999 CORENZA C TABS 20.000 5.000 54.50 40.00 14.50 26.61
";
        let totals = extract(report, None).totals;

        assert_eq!(totals.records, 2);
        assert_eq!(totals.sales_value, dec("100.00"));
        assert_eq!(totals.sales_cost, dec("75.00"));
        assert_eq!(totals.sales_qty, dec("20.000"));
        assert_eq!(totals.gross_profit, dec("25.00"));
        assert_eq!(totals.gp_percent, dec("25.00"));
    }

    #[test]
    fn test_department_label_from_catalog() {
        let mut catalog = DepartmentCatalog::default();
        catalog.insert("BAAC", "Analgesics");

        let fields = extract(
            "BAAC01 ST1234 PANADO 500MG 100.000 15.000 45.50 35.00 10.50 23.08",
            Some(&catalog),
        );
        assert_eq!(fields.lines[0].department_label.as_deref(), Some("Analgesics"));
    }

    #[test]
    fn test_garbage_yields_empty_fields() {
        let fields = extract("\u{0}\u{1} short\nnot a data row at all, but long enough", None);
        assert!(fields.lines.is_empty());
        assert_eq!(fields.totals.gp_percent, Decimal::ZERO);
    }
}
