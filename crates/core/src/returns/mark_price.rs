use rust_decimal::Decimal;

use crate::constants::DEFAULT_MARK_PRICE;
use crate::errors::{Error, Result, ValidationError};

/// Source of the current market price for a ticker.
pub trait MarkPriceSourceTrait: Send + Sync {
    fn price(&self, ticker: &str) -> Result<Decimal>;
}

/// Prices every ticker at one configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedMarkPriceSource {
    price: Decimal,
}

impl FixedMarkPriceSource {
    pub fn new(price: Decimal) -> Result<Self> {
        if price.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Mark price cannot be negative: {}",
                price
            ))));
        }
        Ok(Self { price })
    }
}

impl Default for FixedMarkPriceSource {
    fn default() -> Self {
        Self {
            price: DEFAULT_MARK_PRICE,
        }
    }
}

impl MarkPriceSourceTrait for FixedMarkPriceSource {
    fn price(&self, _ticker: &str) -> Result<Decimal> {
        Ok(self.price)
    }
}
