//! Database models for trades.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use tradebook_core::errors::Error;
use tradebook_core::trades::{Trade, TradeSide};

/// Database model for trades. Prices and timestamps are stored as text.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeDB {
    pub id: String,
    pub ticker: String,
    pub side: String,
    pub price: String,
    pub shares: i64,
    pub traded_at: String,
}

impl TradeDB {
    pub fn from_trade(trade: Trade, id: String) -> Self {
        Self {
            id,
            ticker: trade.ticker,
            side: trade.side.as_str().to_string(),
            price: trade.price.to_string(),
            shares: trade.shares,
            traded_at: trade.timestamp.to_rfc3339(),
        }
    }
}

impl TryFrom<TradeDB> for Trade {
    type Error = Error;

    fn try_from(db: TradeDB) -> Result<Self, Self::Error> {
        Ok(Trade {
            side: TradeSide::from_str(&db.side)?,
            price: Decimal::from_str(&db.price)?,
            timestamp: DateTime::parse_from_rfc3339(&db.traded_at)?.with_timezone(&Utc),
            id: Some(db.id),
            ticker: db.ticker,
            shares: db.shares,
        })
    }
}
