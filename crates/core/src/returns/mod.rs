//! Returns module - unrealized gain of current holdings against mark prices.

mod mark_price;
mod returns_calculator;

#[cfg(test)]
mod returns_calculator_tests;

pub use mark_price::{FixedMarkPriceSource, MarkPriceSourceTrait};
pub use returns_calculator::{holding_return, total_return};
