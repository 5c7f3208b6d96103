use crate::errors::Result;
use crate::holdings::Holding;
use crate::ledger::ledger_model::{LedgerCommit, PortfolioEntry};
use crate::trades::Trade;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for persisting a trade write and its holding changes atomically.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Applies the whole commit or none of it. Returns the stored trade for
    /// `Create` and `Update`, `None` for `Delete`.
    async fn commit(&self, commit: LedgerCommit) -> Result<Option<Trade>>;
}

/// Trait for ledger service operations
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    async fn add_trade(&self, trade: Trade) -> Result<Trade>;
    async fn update_trade(&self, trade_id: &str, trade: Trade) -> Result<Trade>;
    async fn delete_trade(&self, trade_id: &str) -> Result<Trade>;
    fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>>;
    fn get_trades(&self) -> Result<Vec<Trade>>;
    fn get_trades_by_ticker(&self, ticker: &str) -> Result<Vec<Trade>>;
    fn get_holding(&self, ticker: &str) -> Result<Option<Holding>>;
    fn get_holdings(&self) -> Result<Vec<Holding>>;
    fn get_portfolio(&self) -> Result<Vec<PortfolioEntry>>;
    /// Rebuilds every holding from the full trade history.
    async fn refresh_holdings(&self) -> Result<Vec<Holding>>;
    /// Unrealized return across all holdings, `None` when nothing is held.
    fn get_returns(&self) -> Result<Option<Decimal>>;
}
