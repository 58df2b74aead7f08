//! The daily metrics record persisted per (branch, date).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One reconciled row of daily business metrics.
///
/// Unique per (branch, date); that pair is the idempotency key for every
/// upsert. All metric columns are nullable: a null means "never observed",
/// which is distinct from an observed zero. Once a maximized field holds a
/// value it only ever grows across reconciliation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub branch: String,
    pub date: NaiveDate,

    // Financial metrics, maximized field by field.
    pub turnover: Option<Decimal>,
    pub gp_value: Option<Decimal>,
    pub cost_of_sales: Option<Decimal>,
    pub purchases: Option<Decimal>,
    pub disp_turnover: Option<Decimal>,

    // Counters, maximized field by field.
    pub transactions_total: Option<i64>,
    pub script_total: Option<i64>,

    // Stock metrics, maximized field by field.
    pub stock_opening: Option<Decimal>,
    pub stock_closing: Option<Decimal>,

    // Payment-method breakdown, maximized field by field.
    pub sales_cash: Option<Decimal>,
    pub sales_account: Option<Decimal>,
    pub sales_cod: Option<Decimal>,
    pub type_r_sales: Option<Decimal>,

    // Derived bundle: taken wholesale from whichever side won the turnover
    // anchor, so averages stay consistent with the values they were computed
    // from. Adjustments rides with the bundle because it can legitimately be
    // negative.
    pub gp_percent: Option<Decimal>,
    pub avg_basket_value: Option<Decimal>,
    pub avg_basket_size: Option<Decimal>,
    pub avg_script_value: Option<Decimal>,
    pub adjustments: Option<Decimal>,
}

impl DailyMetrics {
    /// Create an empty record for a (branch, date) key.
    pub fn new(branch: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            branch: branch.into(),
            date,
            turnover: None,
            gp_value: None,
            cost_of_sales: None,
            purchases: None,
            disp_turnover: None,
            transactions_total: None,
            script_total: None,
            stock_opening: None,
            stock_closing: None,
            sales_cash: None,
            sales_account: None,
            sales_cod: None,
            type_r_sales: None,
            gp_percent: None,
            avg_basket_value: None,
            avg_basket_size: None,
            avg_script_value: None,
            adjustments: None,
        }
    }
}
