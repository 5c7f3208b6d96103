//! Collapses every trade of one ticker into a single net trade.
//!
//! Buys are summed into one synthetic buy and sells into one synthetic sell.
//! When both exist, the side with more shares wins and keeps its blended
//! cost reduced in proportion to the shares the other side cancels, the
//! same reduction a sell at average cost applies. Equal share counts net to
//! a flat BUY.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::holdings::holdings_model::NetTrade;
use crate::trades::{Trade, TradeSide};
use crate::utils::decimal_utils::{add_checked, mul_checked, scale_by_ratio};

/// Merges `trades` (all for `ticker`) into one net trade, or `None` when
/// there are no trades. A flat result has zero shares.
pub fn merge_trades(ticker: &str, trades: &[Trade]) -> Result<Option<NetTrade>> {
    if let Some(stray) = trades.iter().find(|t| t.ticker != ticker) {
        return Err(Error::InconsistentUpdate(format!(
            "trade {} on {} merged into {}",
            stray.id_str(),
            stray.ticker,
            ticker
        )));
    }

    let (buys, sells): (Vec<&Trade>, Vec<&Trade>) = trades.iter().partition(|t| t.is_buy());
    let buy = combine_side(ticker, TradeSide::Buy, buys)?;
    let sell = combine_side(ticker, TradeSide::Sell, sells)?;

    match (buy, sell) {
        (None, None) => Ok(None),
        (Some(only), None) | (None, Some(only)) => Ok(Some(only)),
        (Some(buy), Some(sell)) => net_sides(buy, sell).map(Some),
    }
}

/// Folds one side's trades, oldest first, into a synthetic trade carrying
/// the summed shares, summed cost and the latest timestamp.
fn combine_side(
    ticker: &str,
    side: TradeSide,
    mut trades: Vec<&Trade>,
) -> Result<Option<NetTrade>> {
    if trades.is_empty() {
        return Ok(None);
    }
    trades.sort_by_key(|t| t.timestamp);

    let mut shares: i64 = 0;
    let mut total_cost = Decimal::ZERO;
    let mut last_updated: Option<DateTime<Utc>> = None;
    for trade in trades {
        shares = shares.checked_add(trade.shares).ok_or_else(|| {
            Error::Arithmetic(format!("share count overflow merging {}", ticker))
        })?;
        total_cost = add_checked(
            total_cost,
            mul_checked(trade.price, Decimal::from(trade.shares))?,
        )?;
        last_updated = Some(trade.timestamp);
    }

    Ok(last_updated.map(|last_updated| NetTrade {
        ticker: ticker.to_string(),
        side,
        shares,
        total_cost,
        last_updated,
    }))
}

fn net_sides(buy: NetTrade, sell: NetTrade) -> Result<NetTrade> {
    let last_updated = buy.last_updated.max(sell.last_updated);
    // Ties go to the buy side, netting a closed position to a flat BUY.
    let (majority, minority) = if buy.shares >= sell.shares {
        (buy, sell)
    } else {
        (sell, buy)
    };

    let net_shares = majority.shares - minority.shares;
    let net_cost = scale_by_ratio(majority.total_cost, net_shares, majority.shares)?;

    Ok(NetTrade {
        ticker: majority.ticker,
        side: majority.side,
        shares: net_shares,
        total_cost: net_cost,
        last_updated,
    })
}
