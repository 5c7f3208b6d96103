//! Tests for collapsing a ticker's trades into one net trade.

#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::holdings::merge_trades;
    use crate::trades::{Trade, TradeSide};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 14, 0, 0).unwrap() + Duration::days(n)
    }

    fn trade(side: TradeSide, price: Decimal, shares: i64, at: i64) -> Trade {
        Trade::new("AAA", side, price, shares, day(at))
    }

    #[test]
    fn test_no_trades_merge_to_none() {
        assert_eq!(merge_trades("AAA", &[]).unwrap(), None);
    }

    #[test]
    fn test_buys_only_sum_shares_and_cost() {
        let trades = vec![
            trade(TradeSide::Buy, dec!(30), 10, 2),
            trade(TradeSide::Buy, dec!(10), 10, 1),
        ];
        let net = merge_trades("AAA", &trades).unwrap().unwrap();
        assert_eq!(net.side, TradeSide::Buy);
        assert_eq!(net.shares, 20);
        assert_eq!(net.total_cost, dec!(400));
        assert_eq!(net.last_updated, day(2));
    }

    #[test]
    fn test_buy_majority_keeps_proportional_cost() {
        let trades = vec![
            trade(TradeSide::Buy, dec!(10), 10, 1),
            trade(TradeSide::Buy, dec!(30), 10, 2),
            trade(TradeSide::Sell, dec!(50), 15, 3),
        ];
        let net = merge_trades("AAA", &trades).unwrap().unwrap();
        assert_eq!(net.side, TradeSide::Buy);
        assert_eq!(net.shares, 5);
        // 400 * 5 / 20; the sell price plays no part.
        assert_eq!(net.total_cost, dec!(100));
        assert_eq!(net.last_updated, day(3));
    }

    #[test]
    fn test_sell_majority_nets_to_sell() {
        let trades = vec![
            trade(TradeSide::Sell, dec!(10), 5, 4),
            trade(TradeSide::Buy, dec!(8), 2, 6),
        ];
        let net = merge_trades("AAA", &trades).unwrap().unwrap();
        assert_eq!(net.side, TradeSide::Sell);
        assert_eq!(net.shares, 3);
        assert_eq!(net.total_cost, dec!(30));
        assert_eq!(net.last_updated, day(6));
    }

    #[test]
    fn test_equal_sides_net_to_flat_buy() {
        let trades = vec![
            trade(TradeSide::Buy, dec!(10), 5, 1),
            trade(TradeSide::Sell, dec!(12), 5, 2),
        ];
        let net = merge_trades("AAA", &trades).unwrap().unwrap();
        assert!(net.is_flat());
        assert_eq!(net.side, TradeSide::Buy);
        assert_eq!(net.total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_foreign_ticker_is_rejected() {
        let mut stray = trade(TradeSide::Buy, dec!(1), 1, 1);
        stray.ticker = "BBB".to_string();
        let err = merge_trades("AAA", &[stray]).unwrap_err();
        assert!(matches!(err, Error::InconsistentUpdate(_)));
    }
}
