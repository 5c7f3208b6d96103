//! Ledger module - trade mutations kept in step with holdings.

mod ledger_model;
mod ledger_service;
mod ledger_traits;


pub use ledger_model::{LedgerCommit, PortfolioEntry, TradeWrite};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
