//! Unrealized return: `(mark - average_price) * shares`, summed over holdings.

use rust_decimal::Decimal;

use crate::errors::Result;
use crate::holdings::Holding;
use crate::returns::mark_price::MarkPriceSourceTrait;
use crate::utils::decimal_utils::{add_checked, mul_checked, sub_checked};

/// Unrealized gain of one holding at the source's mark price.
pub fn holding_return(holding: &Holding, prices: &dyn MarkPriceSourceTrait) -> Result<Decimal> {
    let mark = prices.price(&holding.ticker)?;
    let spread = sub_checked(mark, holding.average_price)?;
    mul_checked(spread, Decimal::from(holding.shares))
}

/// Total unrealized gain across `holdings`, or `None` when there are none.
pub fn total_return(
    holdings: &[Holding],
    prices: &dyn MarkPriceSourceTrait,
) -> Result<Option<Decimal>> {
    if holdings.is_empty() {
        return Ok(None);
    }
    holdings
        .iter()
        .try_fold(Decimal::ZERO, |total, holding| {
            add_checked(total, holding_return(holding, prices)?)
        })
        .map(Some)
}
