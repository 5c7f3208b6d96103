use crate::errors::Result;
use crate::holdings::holdings_model::Holding;
use async_trait::async_trait;

/// Trait defining the contract for holding repository operations.
///
/// Holdings are keyed by ticker. Closed positions are deleted, never stored
/// with zero shares.
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    fn get_holding(&self, ticker: &str) -> Result<Option<Holding>>;
    fn list_holdings(&self) -> Result<Vec<Holding>>;
    async fn save_holding(&self, holding: Holding) -> Result<Holding>;
    async fn delete_holding(&self, ticker: &str) -> Result<usize>;
    /// Removes every stored holding and stores `holdings` in their place.
    async fn replace_all_holdings(&self, holdings: Vec<Holding>) -> Result<usize>;
}
