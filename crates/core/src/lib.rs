//! Tradebook Core - Trade ledger, weighted-average cost holdings and returns.
//!
//! This crate contains the accounting engine and the services built on it.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod ledger;
pub mod returns;
pub mod trades;
pub mod utils;

// Re-export the types most callers need
pub use holdings::Holding;
pub use ledger::{LedgerService, LedgerServiceTrait, PortfolioEntry};
pub use trades::{Trade, TradeSide};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
