//! Trading summary extraction: stock movement and the trading account.

use crate::models::fields::TradingFields;
use crate::patterns::{
    TRADING_ADJUSTMENTS, TRADING_COST_OF_SALES, TRADING_GP_PERCENT, TRADING_GP_VALUE,
    TRADING_PURCHASES, TRADING_STOCK_CLOSING, TRADING_STOCK_OPENING, TRADING_TURNOVER,
};

use super::first_amount;

/// Eight independent fields; each falls back through its own pattern list.
pub fn extract(text: &str) -> TradingFields {
    TradingFields {
        stock_opening: first_amount(text, &TRADING_STOCK_OPENING),
        stock_closing: first_amount(text, &TRADING_STOCK_CLOSING),
        purchases: first_amount(text, &TRADING_PURCHASES),
        adjustments: first_amount(text, &TRADING_ADJUSTMENTS),
        cost_of_sales: first_amount(text, &TRADING_COST_OF_SALES),
        gp_value: first_amount(text, &TRADING_GP_VALUE),
        gp_percent: first_amount(text, &TRADING_GP_PERCENT),
        turnover: first_amount(text, &TRADING_TURNOVER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Option<Decimal> {
        Decimal::from_str(s).ok()
    }

    const REPORT: &str = "\
REITZ APTEEK TRADING SUMMARY
FROM: 2025/08/01 TO: 2025/08/05

OPENING STOCK AT START DATE          120,500.00
+ PURCHASES                           45,250.50
+ ADJUSTMENTS                            320.00
- CLOSING STOCK AT END DATE          118,900.00
= COST OF SALES                       47,170.50
SALES AT RETAIL VALUE                 68,400.00
= GROSS PROFIT FROM TRADING           21,229.50
GROSS PROFIT AS A PERCENTAGE OF RETAIL SALES = 31.04
";

    #[test]
    fn test_extract_all_fields() {
        let fields = extract(REPORT);

        assert_eq!(fields.stock_opening, dec("120500.00"));
        assert_eq!(fields.purchases, dec("45250.50"));
        assert_eq!(fields.adjustments, dec("320.00"));
        assert_eq!(fields.stock_closing, dec("118900.00"));
        assert_eq!(fields.cost_of_sales, dec("47170.50"));
        assert_eq!(fields.turnover, dec("68400.00"));
        assert_eq!(fields.gp_value, dec("21229.50"));
        assert_eq!(fields.gp_percent, dec("31.04"));
    }

    #[test]
    fn test_missing_fields_are_null() {
        let fields = extract("OPENING STOCK 1,000.00");

        assert_eq!(fields.stock_opening, dec("1000.00"));
        assert_eq!(fields.stock_closing, None);
        assert_eq!(fields.purchases, None);
        assert_eq!(fields.gp_percent, None);
    }

    #[test]
    fn test_garbage_yields_all_null() {
        assert_eq!(extract("no trading content"), TradingFields::default());
    }
}
