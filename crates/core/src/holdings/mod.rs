//! Holdings module - weighted-average cost positions derived from trades.
//!
//! The accumulator is the only place cost-basis arithmetic happens. The
//! mutation planner (incremental add/update/delete) and the batch reconciler
//! (full-history recompute) both go through it.

pub mod accumulator;
mod holdings_model;
mod holdings_traits;
pub mod mutation_planner;
pub mod reconciler;
pub mod trade_merger;

pub use accumulator::{apply, apply_at};
pub use holdings_model::{ApplyMode, Holding, NetTrade, TradeLeg};
pub use holdings_traits::HoldingRepositoryTrait;
pub use mutation_planner::{plan_add, plan_delete, plan_update, HoldingChange, HoldingsPlan};
pub use reconciler::{reconcile_all, reconcile_all_at};
pub use trade_merger::merge_trades;



#[cfg(test)]
mod trade_merger_tests;
