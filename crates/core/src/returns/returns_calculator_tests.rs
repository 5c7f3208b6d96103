//! Tests for unrealized return calculation.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::holdings::Holding;
    use crate::returns::{holding_return, total_return, FixedMarkPriceSource, MarkPriceSourceTrait};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct MapPrices(HashMap<String, Decimal>);

    impl MarkPriceSourceTrait for MapPrices {
        fn price(&self, ticker: &str) -> Result<Decimal> {
            self.0
                .get(ticker)
                .copied()
                .ok_or_else(|| Error::NotFound(format!("No price for {}", ticker)))
        }
    }

    fn holding(ticker: &str, shares: i64, total_cost: Decimal, average_price: Decimal) -> Holding {
        Holding {
            ticker: ticker.to_string(),
            total_cost,
            shares,
            average_price,
            last_updated: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_default_source_prices_at_one_hundred() {
        let source = FixedMarkPriceSource::default();
        assert_eq!(source.price("ANY").unwrap(), dec!(100));
        assert!(FixedMarkPriceSource::new(dec!(-1)).is_err());
    }

    #[test]
    fn test_holding_return_uses_average_price() {
        let h = holding("AAA", 6, dec!(60), dec!(10));
        let prices = FixedMarkPriceSource::new(dec!(12.5)).unwrap();
        assert_eq!(holding_return(&h, &prices).unwrap(), dec!(15));
    }

    #[test]
    fn test_total_return_sums_gains_and_losses() {
        let holdings = vec![
            holding("AAA", 10, dec!(100), dec!(10)),
            holding("BBB", 4, dec!(200), dec!(50)),
        ];
        let prices = MapPrices(HashMap::from([
            ("AAA".to_string(), dec!(15)),
            ("BBB".to_string(), dec!(40)),
        ]));
        // 10 * 5 + 4 * -10
        assert_eq!(total_return(&holdings, &prices).unwrap(), Some(dec!(10)));
    }

    #[test]
    fn test_total_return_is_none_without_holdings() {
        let prices = FixedMarkPriceSource::default();
        assert_eq!(total_return(&[], &prices).unwrap(), None);
    }

    #[test]
    fn test_missing_price_propagates() {
        let holdings = vec![holding("AAA", 1, dec!(1), dec!(1))];
        let prices = MapPrices(HashMap::new());
        assert!(matches!(
            total_return(&holdings, &prices),
            Err(Error::NotFound(_))
        ));
    }
}
