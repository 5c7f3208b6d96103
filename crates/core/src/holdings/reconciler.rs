//! Recomputes every holding from the full trade history.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::holdings::accumulator::apply_at;
use crate::holdings::holdings_model::{ApplyMode, Holding};
use crate::holdings::trade_merger::merge_trades;
use crate::trades::{Trade, TradeSide};

/// Rebuilds holdings from `trades`, stamping them with the current time.
pub fn reconcile_all(trades: &[Trade]) -> Result<Vec<Holding>> {
    reconcile_all_at(trades, Utc::now())
}

/// Rebuilds holdings from `trades`: one net trade per ticker, applied once to
/// an empty holding. Tickers whose trades net to zero shares are omitted.
/// Results are ordered by ticker.
///
/// Fails with `NegativeBalance` when a ticker's history sells more shares
/// than it buys.
pub fn reconcile_all_at(trades: &[Trade], now: DateTime<Utc>) -> Result<Vec<Holding>> {
    let mut by_ticker: BTreeMap<&str, Vec<Trade>> = BTreeMap::new();
    for trade in trades {
        by_ticker
            .entry(trade.ticker.as_str())
            .or_default()
            .push(trade.clone());
    }

    let mut holdings = Vec::with_capacity(by_ticker.len());
    for (ticker, ticker_trades) in by_ticker {
        let Some(net) = merge_trades(ticker, &ticker_trades)? else {
            continue;
        };
        if net.is_flat() {
            debug!("Trades for {} net to a closed position", ticker);
            continue;
        }
        if net.side == TradeSide::Sell {
            warn!(
                "Trades for {} sell {} more shares than they buy",
                ticker, net.shares
            );
            return Err(Error::NegativeBalance {
                ticker: ticker.to_string(),
                shares: -net.shares,
                total_cost: -net.total_cost,
            });
        }

        let holding = apply_at(&Holding::empty(ticker, now), &net, ApplyMode::Forward, now)?;
        if !holding.is_closed() {
            holdings.push(holding);
        }
    }

    debug!(
        "Reconciled {} trades into {} holdings",
        trades.len(),
        holdings.len()
    );
    Ok(holdings)
}
