// Library module for testable functions

pub mod api;
pub mod config;
pub mod ingestion;
pub mod logging;
pub mod map;
pub mod valuation;

use rust_decimal::Decimal;

/// Calculate a cash offer from an estimated value
/// Formula: estimated_value × offer_percent / 100, rounded to whole dollars
pub fn calculate_cash_offer(estimated_value: i64, offer_percent: Decimal) -> Option<Decimal> {
    if estimated_value <= 0
        || offer_percent <= Decimal::ZERO
        || offer_percent > Decimal::ONE_HUNDRED
    {
        return None;
    }
    let offer = Decimal::from(estimated_value) * offer_percent / Decimal::ONE_HUNDRED;
    Some(offer.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_offer_calculation() {
        // Test normal case
        let offer = calculate_cash_offer(250_000, Decimal::from(70));
        assert_eq!(offer, Some(Decimal::from(175_000)));
    }

    #[test]
    fn test_cash_offer_fractional_percent() {
        // 72.5% of 199,999 = 144,999.275
        let offer = calculate_cash_offer(199_999, Decimal::new(725, 1));
        assert_eq!(offer, Some(Decimal::from(144_999)));
    }

    #[test]
    fn test_cash_offer_zero_value() {
        // Test with zero value (should return None)
        assert!(calculate_cash_offer(0, Decimal::from(70)).is_none());
    }

    #[test]
    fn test_cash_offer_negative_value() {
        assert!(calculate_cash_offer(-100_000, Decimal::from(70)).is_none());
    }

    #[test]
    fn test_cash_offer_percent_out_of_range() {
        assert!(calculate_cash_offer(100_000, Decimal::ZERO).is_none());
        assert!(calculate_cash_offer(100_000, Decimal::from(101)).is_none());
    }

    #[test]
    fn test_cash_offer_full_value() {
        let offer = calculate_cash_offer(100_000, Decimal::ONE_HUNDRED);
        assert_eq!(offer, Some(Decimal::from(100_000)));
    }
}
