//! Same-run aggregation: merge extracted documents into one candidate
//! record per (branch, date).
//!
//! When several surviving documents of the same category compete - two
//! independent transmissions, say - the one with the strictly larger anchor
//! metric wins the whole category slot, so the slot's fields stay mutually
//! consistent. Ties keep the first seen. This is same-run resolution,
//! distinct from the cross-run reconciliation against persisted state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::fields::{
    DispensaryFields, ExtractedFields, GrossProfitFields, TradingFields, TransactionFields,
    TurnoverFields,
};
use crate::models::metrics::DailyMetrics;

use super::derived::{basket_size, basket_value};

/// One slot per category for a (branch, date) group.
#[derive(Debug, Clone, Default)]
pub struct CategorySlots {
    pub trading: Option<TradingFields>,
    pub turnover: Option<TurnoverFields>,
    pub transactions: Option<TransactionFields>,
    pub gross_profit: Option<GrossProfitFields>,
    pub dispensary: Option<DispensaryFields>,
}

/// Fill the category slots from extraction outputs, resolving same-category
/// competition by anchor metric.
pub fn merge(outputs: impl IntoIterator<Item = ExtractedFields>) -> CategorySlots {
    let mut slots = CategorySlots::default();

    for output in outputs {
        match output {
            ExtractedFields::TradingSummary(fields) => {
                replace_if_larger(&mut slots.trading, fields, |f| {
                    f.turnover.unwrap_or(Decimal::ZERO)
                });
            }
            ExtractedFields::TurnoverSummary(fields) => {
                replace_if_larger(&mut slots.turnover, fields, |f| {
                    f.turnover.unwrap_or(Decimal::ZERO)
                });
            }
            ExtractedFields::TransactionSummary(fields) => {
                replace_if_larger(&mut slots.transactions, fields, |f| Decimal::from(f.total));
            }
            ExtractedFields::GrossProfitReport(fields) => {
                replace_if_larger(&mut slots.gross_profit, fields, |f| f.totals.gross_profit);
            }
            ExtractedFields::DispensarySummary(fields) => {
                replace_if_larger(&mut slots.dispensary, fields, |f| {
                    Decimal::from(f.script_total.unwrap_or(0))
                });
            }
        }
    }

    slots
}

fn replace_if_larger<T>(slot: &mut Option<T>, incoming: T, anchor: impl Fn(&T) -> Decimal) {
    match slot {
        Some(current) if anchor(&incoming) > anchor(current) => {
            debug!("category slot replaced by larger anchor metric");
            *slot = Some(incoming);
        }
        Some(_) => {}
        None => *slot = Some(incoming),
    }
}

/// Build the candidate record for a (branch, date) from its merged slots.
pub fn candidate(branch: &str, date: NaiveDate, slots: &CategorySlots) -> DailyMetrics {
    let mut record = DailyMetrics::new(branch, date);

    if let Some(trading) = &slots.trading {
        record.stock_opening = trading.stock_opening;
        record.stock_closing = trading.stock_closing;
        record.purchases = trading.purchases;
        record.adjustments = trading.adjustments;
        record.cost_of_sales = trading.cost_of_sales;
        record.gp_value = trading.gp_value;
        record.gp_percent = trading.gp_percent;
    }

    // The turnover summary's nett-exclusive figure is authoritative; the
    // trading summary's retail sales line stands in when no turnover
    // summary arrived.
    record.turnover = slots
        .turnover
        .as_ref()
        .and_then(|t| t.turnover)
        .or_else(|| slots.trading.as_ref().and_then(|t| t.turnover));

    if let Some(turnover) = &slots.turnover {
        record.sales_cash = turnover.sales_cash;
        record.sales_account = turnover.sales_account;
        record.sales_cod = turnover.sales_cod;
        record.type_r_sales = turnover.type_r_sales;
    }

    if let Some(transactions) = &slots.transactions {
        record.transactions_total = Some(transactions.total);
    }

    if let Some(dispensary) = &slots.dispensary {
        record.script_total = dispensary.script_total;
        record.disp_turnover = dispensary.turnover_excl_vat;
        record.avg_script_value = dispensary.avg_script_value;
    }

    let transactions = record.transactions_total.unwrap_or(0);
    let units_sold = slots
        .gross_profit
        .as_ref()
        .map(|gp| gp.totals.sales_qty)
        .unwrap_or(Decimal::ZERO);

    record.avg_basket_size = Some(basket_size(units_sold, transactions));
    record.avg_basket_value = Some(basket_value(
        record.turnover.unwrap_or(Decimal::ZERO),
        transactions,
    ));

    record
}
