//! Per-category extracted field structs.
//!
//! Every field a category's extractor can produce is declared here even when
//! its value is null, so callers never branch on missing keys. Unmatched
//! fields are `None`, never an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::document::ReportKind;

/// Trading summary: stock movement and the trading account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingFields {
    pub stock_opening: Option<Decimal>,
    pub stock_closing: Option<Decimal>,
    pub purchases: Option<Decimal>,
    pub adjustments: Option<Decimal>,
    pub cost_of_sales: Option<Decimal>,
    pub gp_value: Option<Decimal>,
    pub gp_percent: Option<Decimal>,
    pub turnover: Option<Decimal>,
}

/// Turnover summary: nett-exclusive turnover and payment-method totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnoverFields {
    pub turnover: Option<Decimal>,
    pub sales_cash: Option<Decimal>,
    pub sales_account: Option<Decimal>,
    pub sales_cod: Option<Decimal>,
    pub type_r_sales: Option<Decimal>,
}

/// Transaction summary: docket counts from the invoicing audit trail.
///
/// The total is the sum over the fixed docket-type list; paid-outs are
/// excluded by contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFields {
    pub total: i64,
    pub breakdown: BTreeMap<String, i64>,
}

/// One accepted row of a gross profit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesLine {
    /// Department code truncated to the 4-character main department.
    pub department_code: String,
    /// The untruncated 6-character code, kept for reference.
    pub source_department_code: String,
    /// Human label from the department catalog, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_label: Option<String>,
    pub stock_code: String,
    pub description: String,
    pub on_hand: Decimal,
    pub sales_qty: Decimal,
    pub sales_value: Decimal,
    pub sales_cost: Decimal,
    pub gross_profit: Decimal,
    pub turnover_percent: Option<Decimal>,
    pub gp_percent: Decimal,
}

/// Summation over the accepted rows of a gross profit report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrossProfitTotals {
    pub records: usize,
    pub sales_value: Decimal,
    pub sales_cost: Decimal,
    pub sales_qty: Decimal,
    pub on_hand: Decimal,
    pub gross_profit: Decimal,
    /// gross_profit / sales_value * 100, zero when sales value is zero.
    pub gp_percent: Decimal,
}

/// Gross profit report: per-product rows plus their totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrossProfitFields {
    pub lines: Vec<SalesLine>,
    pub totals: GrossProfitTotals,
}

/// Dispensary summary: script statistics and revenue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispensaryFields {
    pub script_total: Option<i64>,
    pub turnover_incl_vat: Option<Decimal>,
    /// turnover_incl_vat divided by the fixed 1.15 VAT factor.
    pub turnover_excl_vat: Option<Decimal>,
    /// turnover_excl_vat / script_total; null when script_total is zero.
    pub avg_script_value: Option<Decimal>,
}

/// Extraction output for one document, tagged by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedFields {
    TurnoverSummary(TurnoverFields),
    GrossProfitReport(GrossProfitFields),
    TradingSummary(TradingFields),
    DispensarySummary(DispensaryFields),
    TransactionSummary(TransactionFields),
}

impl ExtractedFields {
    pub fn kind(&self) -> ReportKind {
        match self {
            ExtractedFields::TurnoverSummary(_) => ReportKind::TurnoverSummary,
            ExtractedFields::GrossProfitReport(_) => ReportKind::GrossProfitReport,
            ExtractedFields::TradingSummary(_) => ReportKind::TradingSummary,
            ExtractedFields::DispensarySummary(_) => ReportKind::DispensarySummary,
            ExtractedFields::TransactionSummary(_) => ReportKind::TransactionSummary,
        }
    }
}
