//! Cross-category derived metrics.

use rust_decimal::Decimal;

/// Average number of items per transaction, 2 decimals.
///
/// Exactly zero (not null, not an error) when the transaction count is zero.
pub fn basket_size(total_units_sold: Decimal, transactions: i64) -> Decimal {
    if transactions > 0 {
        (total_units_sold / Decimal::from(transactions)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

/// Average spend per transaction, 2 decimals.
///
/// Exactly zero when the transaction count is zero or there was no turnover.
pub fn basket_value(turnover: Decimal, transactions: i64) -> Decimal {
    if transactions > 0 && turnover > Decimal::ZERO {
        (turnover / Decimal::from(transactions)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_basket_size() {
        assert_eq!(basket_size(dec("450.000"), 100), dec("4.50"));
        assert_eq!(basket_size(dec("1.000"), 3), dec("0.33"));
    }

    #[test]
    fn test_basket_value() {
        assert_eq!(basket_value(dec("13517.38"), 120), dec("112.64"));
    }

    #[test]
    fn test_zero_transactions_is_exactly_zero() {
        assert_eq!(basket_size(dec("450.000"), 0), Decimal::ZERO);
        assert_eq!(basket_value(dec("13517.38"), 0), Decimal::ZERO);
    }

    #[test]
    fn test_zero_turnover_basket_value_is_zero() {
        assert_eq!(basket_value(Decimal::ZERO, 100), Decimal::ZERO);
    }
}
