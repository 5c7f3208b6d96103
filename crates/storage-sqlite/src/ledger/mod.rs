//! SQLite storage implementation for atomic ledger commits.

mod repository;

pub use repository::LedgerRepository;
