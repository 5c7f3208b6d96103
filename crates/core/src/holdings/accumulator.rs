//! Applies a single trade leg to a holding snapshot.
//!
//! Weighted-average cost rules:
//! - A buy adds `price * shares` to the cost basis and re-blends the average.
//! - A sell removes cost at the holding's current average, whatever the sale
//!   price, and leaves the average untouched.
//! - Undoing a trade (`ApplyMode::Reverse`) flips the side and re-runs the
//!   same math. The leg cost is always priced from the leg's own side, so
//!   undoing a sell restores exactly the cost the sell removed.

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::holdings::holdings_model::{ApplyMode, Holding, TradeLeg};
use crate::trades::TradeSide;
use crate::utils::decimal_utils::{add_checked, div_rounded, scale_by_ratio, sub_checked};

/// Applies `leg` to `holding`, stamping the result with the current time.
pub fn apply<L: TradeLeg + ?Sized>(
    holding: &Holding,
    leg: &L,
    mode: ApplyMode,
) -> Result<Holding> {
    apply_at(holding, leg, mode, Utc::now())
}

/// Applies `leg` to `holding` and returns the new snapshot.
///
/// The input is never modified; on error the caller still holds the
/// untouched snapshot.
pub fn apply_at<L: TradeLeg + ?Sized>(
    holding: &Holding,
    leg: &L,
    mode: ApplyMode,
    now: DateTime<Utc>,
) -> Result<Holding> {
    if holding.ticker != leg.ticker() {
        return Err(Error::InconsistentUpdate(format!(
            "trade for {} applied to holding {}",
            leg.ticker(),
            holding.ticker
        )));
    }
    if leg.shares() <= 0 {
        return Err(Error::InvalidTrade(format!(
            "Shares must be positive, got {}",
            leg.shares()
        )));
    }

    let leg_cost = leg_cost(holding, leg)?;
    let mut next = holding.clone();

    match mode.effective_side(leg.side()) {
        TradeSide::Buy => {
            next.total_cost = add_checked(holding.total_cost, leg_cost)?;
            next.shares = checked_shares(holding.shares.checked_add(leg.shares()), holding)?;
            next.average_price = div_rounded(next.total_cost, Decimal::from(next.shares))?;
        }
        TradeSide::Sell => {
            next.total_cost = sub_checked(holding.total_cost, leg_cost)?;
            next.shares = checked_shares(holding.shares.checked_sub(leg.shares()), holding)?;
            if next.shares == 0 {
                if !next.total_cost.is_zero() {
                    debug!(
                        "Clearing residual cost {} on closed holding {}",
                        next.total_cost, next.ticker
                    );
                }
                next.total_cost = Decimal::ZERO;
                next.average_price = Decimal::ZERO;
            } else if mode == ApplyMode::Reverse && next.shares > 0 {
                next.average_price = div_rounded(next.total_cost, Decimal::from(next.shares))?;
            }
        }
    }

    if next.shares < 0 || next.total_cost < Decimal::ZERO {
        return Err(Error::NegativeBalance {
            ticker: next.ticker,
            shares: next.shares,
            total_cost: next.total_cost,
        });
    }

    next.last_updated = now;
    Ok(next)
}

/// Cost carried by the leg, priced from the leg's own side: the quoted cost
/// for a buy, the holding's average cost for a sell.
fn leg_cost<L: TradeLeg + ?Sized>(holding: &Holding, leg: &L) -> Result<Decimal> {
    match leg.side() {
        TradeSide::Buy => leg.buy_cost(),
        TradeSide::Sell => {
            if holding.shares <= 0 {
                // Nothing held: there is no average to sell at.
                return Err(Error::NegativeBalance {
                    ticker: holding.ticker.clone(),
                    shares: holding.shares - leg.shares(),
                    total_cost: holding.total_cost,
                });
            }
            scale_by_ratio(holding.total_cost, leg.shares(), holding.shares)
        }
    }
}

fn checked_shares(result: Option<i64>, holding: &Holding) -> Result<i64> {
    result.ok_or_else(|| {
        Error::Arithmetic(format!("share count overflow on holding {}", holding.ticker))
    })
}
