//! SQLite storage implementation for trades.

mod model;
mod repository;

pub use model::TradeDB;
pub use repository::TradeRepository;
pub(crate) use repository::{delete_trade_row, insert_trade, update_trade_row};
