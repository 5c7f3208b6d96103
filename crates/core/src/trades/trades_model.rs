//! Trade domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn flipped(self) -> Self {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown trade side '{}'",
                other
            )))),
        }
    }
}

/// A single buy or sell of a security.
///
/// `id` is absent until the trade store assigns one. `timestamp` is when the
/// trade was executed; it orders trades during full-history reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default)]
    pub id: Option<String>,
    pub ticker: String,
    pub side: TradeSide,
    pub price: Decimal,
    pub shares: i64,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        ticker: impl Into<String>,
        side: TradeSide,
        price: Decimal,
        shares: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Trade {
            id: None,
            ticker: ticker.into(),
            side,
            price,
            shares,
            timestamp,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }

    /// Identifier as a display string, for logs and error messages.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("<unsaved>")
    }
}

/// Checks the trade's own fields: a non-empty ticker, positive shares and a
/// positive price. Whether a SELL has anything to sell depends on the current
/// holding and is checked by the ledger service.
pub fn validate_trade(trade: &Trade) -> Result<()> {
    if trade.ticker.trim().is_empty() {
        return Err(Error::InvalidTrade("Ticker cannot be empty".to_string()));
    }
    if trade.shares == 0 {
        return Err(Error::InvalidTrade("Shares cannot be zero".to_string()));
    }
    if trade.shares < 0 {
        return Err(Error::InvalidTrade(
            "Shares cannot be less than zero".to_string(),
        ));
    }
    if trade.price.is_zero() {
        return Err(Error::InvalidTrade("Price cannot be zero".to_string()));
    }
    if trade.price.is_sign_negative() {
        return Err(Error::InvalidTrade(
            "Price cannot be less than zero".to_string(),
        ));
    }
    Ok(())
}
