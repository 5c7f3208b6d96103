use crate::errors::Result;
use crate::trades::trades_model::Trade;
use async_trait::async_trait;

/// Trait defining the contract for trade repository operations.
#[async_trait]
pub trait TradeRepositoryTrait: Send + Sync {
    fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>>;
    fn list_trades(&self) -> Result<Vec<Trade>>;
    fn list_trades_by_ticker(&self, ticker: &str) -> Result<Vec<Trade>>;
    /// Persists a new trade, assigning an id when the trade has none.
    async fn create_trade(&self, trade: Trade) -> Result<Trade>;
    async fn update_trade(&self, trade: Trade) -> Result<Trade>;
    async fn delete_trade(&self, trade_id: &str) -> Result<usize>;
}
