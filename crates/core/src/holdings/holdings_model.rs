//! Holding domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::trades::{Trade, TradeSide};
use crate::utils::decimal_utils::mul_checked;

/// Aggregated position in one ticker.
///
/// When `shares` is zero, `total_cost` and `average_price` are zero as well.
/// Otherwise `average_price` is `total_cost / shares` at the time it was last
/// recomputed; a forward sell reduces cost and shares but keeps the average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub ticker: String,
    pub total_cost: Decimal,
    pub shares: i64,
    pub average_price: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl Holding {
    /// Zero-valued holding used the first time a ticker is traded.
    pub fn empty(ticker: impl Into<String>, now: DateTime<Utc>) -> Self {
        Holding {
            ticker: ticker.into(),
            total_cost: Decimal::ZERO,
            shares: 0,
            average_price: Decimal::ZERO,
            last_updated: now,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shares == 0
    }

    /// Compares accounting fields only, ignoring `last_updated`.
    pub fn same_position(&self, other: &Holding) -> bool {
        self.ticker == other.ticker
            && self.shares == other.shares
            && self.total_cost == other.total_cost
            && self.average_price == other.average_price
    }
}

/// Whether a trade's effect is being applied or undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Forward,
    /// Undo a previously applied trade: a BUY is undone like a SELL and a
    /// SELL like a BUY.
    Reverse,
}

impl ApplyMode {
    pub fn effective_side(self, side: TradeSide) -> TradeSide {
        match self {
            ApplyMode::Forward => side,
            ApplyMode::Reverse => side.flipped(),
        }
    }
}

/// Anything the accumulator can apply to a holding.
pub trait TradeLeg {
    fn ticker(&self) -> &str;
    fn side(&self) -> TradeSide;
    fn shares(&self) -> i64;
    /// Cost the leg adds to a holding when it is a buy.
    fn buy_cost(&self) -> Result<Decimal>;
}

impl TradeLeg for Trade {
    fn ticker(&self) -> &str {
        &self.ticker
    }

    fn side(&self) -> TradeSide {
        self.side
    }

    fn shares(&self) -> i64 {
        self.shares
    }

    fn buy_cost(&self) -> Result<Decimal> {
        mul_checked(self.price, Decimal::from(self.shares))
    }
}

/// One synthetic trade standing in for every trade of a ticker.
///
/// Carries the blended total cost rather than a unit price, so applying it
/// does not re-round through a per-share price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetTrade {
    pub ticker: String,
    pub side: TradeSide,
    pub shares: i64,
    pub total_cost: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl NetTrade {
    /// Buys and sells cancel out.
    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }
}

impl TradeLeg for NetTrade {
    fn ticker(&self) -> &str {
        &self.ticker
    }

    fn side(&self) -> TradeSide {
        self.side
    }

    fn shares(&self) -> i64 {
        self.shares
    }

    fn buy_cost(&self) -> Result<Decimal> {
        Ok(self.total_cost)
    }
}
