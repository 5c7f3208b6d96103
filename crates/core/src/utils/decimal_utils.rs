//! Decimal helpers shared by the holdings engine.
//!
//! Every division in cost-basis arithmetic goes through [`div_rounded`] so the
//! rounding mode and precision are identical on the incremental and the batch
//! paths.

use rust_decimal::Decimal;

use crate::errors::{Error, Result};

/// Divides `numerator` by `denominator` at the full
/// [`DECIMAL_PRECISION`](crate::constants::DECIMAL_PRECISION) significant
/// digits. `Decimal` division rounds the last digit half-to-even.
pub fn div_rounded(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| {
            Error::Arithmetic(format!(
                "cannot divide {} by {}",
                numerator, denominator
            ))
        })
}

pub fn mul_checked(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| Error::Arithmetic(format!("{} * {} overflows", lhs, rhs)))
}

pub fn add_checked(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| Error::Arithmetic(format!("{} + {} overflows", lhs, rhs)))
}

pub fn sub_checked(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_sub(rhs)
        .ok_or_else(|| Error::Arithmetic(format!("{} - {} overflows", lhs, rhs)))
}

/// `value * numerator / denominator`, multiplying first so a proportional
/// reduction loses precision only in the final division.
pub fn scale_by_ratio(value: Decimal, numerator: i64, denominator: i64) -> Result<Decimal> {
    let scaled = mul_checked(value, Decimal::from(numerator))?;
    div_rounded(scaled, Decimal::from(denominator))
}

/// True when `a` and `b` differ by at most `tolerance`.
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}
