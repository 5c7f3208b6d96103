use serde::{Deserialize, Serialize};

use crate::holdings::HoldingsPlan;
use crate::trades::Trade;

/// A held ticker together with the trades recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub ticker: String,
    pub trades: Vec<Trade>,
}

/// The trade-side half of a ledger commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeWrite {
    /// Insert; an id is assigned when the trade has none.
    Create(Trade),
    /// Overwrite the stored trade with the same id.
    Update(Trade),
    /// Remove the trade with this id.
    Delete(String),
}

/// One trade write and the holding changes it causes, persisted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCommit {
    pub trade: TradeWrite,
    pub holdings: HoldingsPlan,
}
