//! Turnover summary extraction.
//!
//! Totals lines print three numeric groups per line - gross, discount,
//! nett-of-discount-net-of-VAT. The THIRD group is the business value; a
//! trailing minus negates only the group it is attached to.

use regex::Regex;
use rust_decimal::Decimal;

use crate::models::fields::TurnoverFields;
use crate::patterns::{
    TURNOVER_ACCOUNT, TURNOVER_CASH, TURNOVER_COD, TURNOVER_NETT_FALLBACK, TURNOVER_TOTAL,
    TURNOVER_TYPE_R,
};

use super::parse_amount;

pub fn extract(text: &str) -> TurnoverFields {
    TurnoverFields {
        turnover: nett_group(text, &TURNOVER_TOTAL)
            .or_else(|| TURNOVER_NETT_FALLBACK.captures(text).and_then(|c| parse_amount(&c[1]))),
        sales_cash: nett_group(text, &TURNOVER_CASH),
        sales_account: nett_group(text, &TURNOVER_ACCOUNT),
        sales_cod: nett_group(text, &TURNOVER_COD),
        type_r_sales: nett_group(text, &TURNOVER_TYPE_R),
    }
}

fn nett_group(text: &str, rule: &Regex) -> Option<Decimal> {
    rule.captures(text).and_then(|caps| parse_amount(&caps[3]))
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
    fn test_third_group_wins() {
        let text = "** TOTAL TURNOVER 1,000.00 150.00- 850.00";
        assert_eq!(extract(text).turnover, dec("850.00"));
    }

    #[test]
    fn test_trailing_minus_negates_only_its_group() {
        let text = "** TOTAL TURNOVER 1,000.00 150.00- 850.00-";
        assert_eq!(extract(text).turnover, dec("-850.00"));
    }

    #[test]
    fn test_payment_method_totals() {
        let text = "\
** CASH TOTALS          10,500.00    250.00-    8,913.04
** STANDARD ACCOUNTS     4,200.00      0.00     3,652.17
** C.O.D. ACCOUNTS         980.00      0.00       852.17
** TYPE R SALES            115.00      0.00       100.00
** TOTAL TURNOVER       15,795.00    250.00-   13,517.38
";
        let fields = extract(text);

        assert_eq!(fields.sales_cash, dec("8913.04"));
        assert_eq!(fields.sales_account, dec("3652.17"));
        assert_eq!(fields.sales_cod, dec("852.17"));
        assert_eq!(fields.type_r_sales, dec("100.00"));
        assert_eq!(fields.turnover, dec("13517.38"));
    }

    #[test]
    fn test_nett_exclusive_fallback() {
        let text = "TURNOVER SUMMARY\nSOMETHING 9,876.54 NETT (EXCLUSIVE)";
        assert_eq!(extract(text).turnover, dec("9876.54"));
    }

    #[test]
    fn test_garbage_yields_all_null() {
        assert_eq!(extract("no totals here"), TurnoverFields::default());
    }
}
