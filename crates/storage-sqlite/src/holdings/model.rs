//! Database models for holdings.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use tradebook_core::errors::Error;
use tradebook_core::holdings::Holding;

/// Database model for holdings, keyed by ticker.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(primary_key(ticker))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub ticker: String,
    pub total_cost: String,
    pub shares: i64,
    pub average_price: String,
    pub last_updated: String,
}

impl From<Holding> for HoldingDB {
    fn from(domain: Holding) -> Self {
        Self {
            ticker: domain.ticker,
            total_cost: domain.total_cost.to_string(),
            shares: domain.shares,
            average_price: domain.average_price.to_string(),
            last_updated: domain.last_updated.to_rfc3339(),
        }
    }
}

impl TryFrom<HoldingDB> for Holding {
    type Error = Error;

    fn try_from(db: HoldingDB) -> Result<Self, Self::Error> {
        Ok(Holding {
            total_cost: Decimal::from_str(&db.total_cost)?,
            average_price: Decimal::from_str(&db.average_price)?,
            last_updated: DateTime::parse_from_rfc3339(&db.last_updated)?.with_timezone(&Utc),
            ticker: db.ticker,
            shares: db.shares,
        })
    }
}
