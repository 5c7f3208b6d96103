//! Turns a trade mutation into the holding changes it requires.
//!
//! Planning is pure: the caller fetches the current holdings, and persists
//! the returned plan. A plan with two changes (an update that moves a trade
//! to another ticker) must be committed atomically.

use chrono::{DateTime, Utc};
use log::debug;

use crate::errors::{Error, Result};
use crate::holdings::accumulator::apply_at;
use crate::holdings::holdings_model::{ApplyMode, Holding};
use crate::trades::Trade;

/// What to persist for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldingChange {
    Save(Holding),
    /// The position closed; remove the stored holding.
    Delete(String),
}

impl HoldingChange {
    pub fn from_holding(holding: Holding) -> Self {
        if holding.is_closed() {
            HoldingChange::Delete(holding.ticker)
        } else {
            HoldingChange::Save(holding)
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            HoldingChange::Save(holding) => &holding.ticker,
            HoldingChange::Delete(ticker) => ticker,
        }
    }
}

/// Holding changes produced by one trade mutation, all or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldingsPlan {
    pub changes: Vec<HoldingChange>,
}

impl HoldingsPlan {
    fn single(holding: Holding) -> Self {
        HoldingsPlan {
            changes: vec![HoldingChange::from_holding(holding)],
        }
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.changes.iter().map(HoldingChange::ticker).collect()
    }

    /// Saved holding for `ticker`, if the plan keeps it open.
    pub fn saved(&self, ticker: &str) -> Option<&Holding> {
        self.changes.iter().find_map(|change| match change {
            HoldingChange::Save(holding) if holding.ticker == ticker => Some(holding),
            _ => None,
        })
    }
}

/// Adds `trade` to its ticker's holding, starting from an empty holding when
/// the ticker is new.
pub fn plan_add(
    existing: Option<&Holding>,
    trade: &Trade,
    now: DateTime<Utc>,
) -> Result<HoldingsPlan> {
    let base = resolve_holding(existing, trade, now)?;
    let next = apply_at(&base, trade, ApplyMode::Forward, now)?;
    debug!(
        "Planned add of trade {} on {}: {} shares, cost {}",
        trade.id_str(),
        trade.ticker,
        next.shares,
        next.total_cost
    );
    Ok(HoldingsPlan::single(next))
}

/// Removes the effect of a previously applied `trade` from `holding`.
pub fn plan_delete(holding: &Holding, trade: &Trade, now: DateTime<Utc>) -> Result<HoldingsPlan> {
    let next = apply_at(holding, trade, ApplyMode::Reverse, now)?;
    debug!(
        "Planned delete of trade {} on {}: {} shares, cost {}",
        trade.id_str(),
        trade.ticker,
        next.shares,
        next.total_cost
    );
    Ok(HoldingsPlan::single(next))
}

/// Replaces `old_trade` with `new_trade`.
///
/// On the same ticker the old trade is reversed and the new one applied to
/// the result, yielding one change. When the ticker changes, the old holding
/// is debited and `new_holding` (empty when `None`) credited, yielding two.
pub fn plan_update(
    old_holding: &Holding,
    old_trade: &Trade,
    new_holding: Option<&Holding>,
    new_trade: &Trade,
    now: DateTime<Utc>,
) -> Result<HoldingsPlan> {
    if old_trade.ticker == new_trade.ticker {
        if let Some(other) = new_holding {
            if other.ticker != old_holding.ticker {
                return Err(Error::InconsistentUpdate(format!(
                    "holding {} passed for a trade on {}",
                    other.ticker, new_trade.ticker
                )));
            }
        }
        let reversed = apply_at(old_holding, old_trade, ApplyMode::Reverse, now)?;
        let next = apply_at(&reversed, new_trade, ApplyMode::Forward, now)?;
        debug!(
            "Planned in-place update of trade {} on {}",
            old_trade.id_str(),
            old_trade.ticker
        );
        return Ok(HoldingsPlan::single(next));
    }

    let debited = apply_at(old_holding, old_trade, ApplyMode::Reverse, now)?;
    let base = resolve_holding(new_holding, new_trade, now)?;
    let credited = apply_at(&base, new_trade, ApplyMode::Forward, now)?;
    debug!(
        "Planned update of trade {} moving {} -> {}",
        old_trade.id_str(),
        old_trade.ticker,
        new_trade.ticker
    );
    Ok(HoldingsPlan {
        changes: vec![
            HoldingChange::from_holding(debited),
            HoldingChange::from_holding(credited),
        ],
    })
}

fn resolve_holding(
    existing: Option<&Holding>,
    trade: &Trade,
    now: DateTime<Utc>,
) -> Result<Holding> {
    match existing {
        Some(holding) if holding.ticker != trade.ticker => Err(Error::InconsistentUpdate(format!(
            "holding {} passed for a trade on {}",
            holding.ticker, trade.ticker
        ))),
        Some(holding) => Ok(holding.clone()),
        None => Ok(Holding::empty(trade.ticker.clone(), now)),
    }
}
