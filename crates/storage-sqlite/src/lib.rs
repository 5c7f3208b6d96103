//! SQLite storage implementation for Tradebook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `tradebook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for trades and holdings
//! - The atomic ledger commit used by the ledger service
//!
//! All writes go through a single writer actor (`db::write_actor`), which runs
//! each job inside one immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod holdings;
pub mod ledger;
pub mod trades;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use holdings::HoldingRepository;
pub use ledger::LedgerRepository;
pub use trades::TradeRepository;

// Re-export storage errors
pub use errors::StorageError;

// Re-export from tradebook-core for convenience
pub use tradebook_core::errors::{DatabaseError, Error, Result};
