//! Trades module - the buy/sell events holdings are derived from.

mod trades_model;
mod trades_traits;


pub use trades_model::{validate_trade, Trade, TradeSide};
pub use trades_traits::TradeRepositoryTrait;
