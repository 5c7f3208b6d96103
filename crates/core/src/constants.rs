use rust_decimal::Decimal;

/// Significant digits carried by every quotient in cost-basis arithmetic.
/// This is the full width of the 96-bit `Decimal` mantissa; the last digit
/// is rounded half-to-even.
pub const DECIMAL_PRECISION: u32 = 28;

/// Mark price used for returns when no other source is configured.
pub const DEFAULT_MARK_PRICE: Decimal = Decimal::ONE_HUNDRED;
