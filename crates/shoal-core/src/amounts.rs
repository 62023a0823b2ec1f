//! Slippage-bounded amount computation.
//!
//! The ledger stores token balances at a fixed per-token decimal
//! precision, so every amount is cut (never rounded) to that precision
//! before it enters a request. The two economically meaningful bounds:
//!
//! - exact-in: the minimum acceptable output, `amount * (1 - slippage)`
//! - exact-out: the maximum acceptable input, `amount * (1 + slippage)`
//!
//! All functions are pure and deterministic. A bound that lands at or
//! below zero is an input-validation failure and is surfaced, never
//! clamped.

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The computed amount was zero or negative after truncation.
    NotPositive(Decimal),
}

impl std::fmt::Display for AmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AmountError::NotPositive(d) => {
                write!(f, "amount must be positive, got {}", d)
            }
        }
    }
}

impl std::error::Error for AmountError {}

/// Cut `amount` to `precision` fractional digits. Truncation, not
/// rounding — 1.9999 at precision 2 is 1.99.
pub fn truncate(amount: Decimal, precision: u32) -> Decimal {
    amount.trunc_with_scale(precision)
}

fn require_positive(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }
    Ok(amount)
}

/// The exact-side amount of a swap: the input truncated to the token's
/// precision. Fails if the truncated amount is not positive.
pub fn exact_amount(amount: Decimal, precision: u32) -> Result<Decimal, AmountError> {
    require_positive(truncate(amount, precision))
}

/// Exact-in counter bound: the minimum output still acceptable after
/// slippage, truncated to the counter token's precision.
pub fn min_output(
    counter_amount: Decimal,
    slippage: Decimal,
    counter_precision: u32,
) -> Result<Decimal, AmountError> {
    require_positive(truncate(
        counter_amount * (Decimal::ONE - slippage),
        counter_precision,
    ))
}

/// Exact-out counter bound: the maximum input the user is willing to
/// spend after slippage, truncated to the counter token's precision.
pub fn max_input(
    counter_amount: Decimal,
    slippage: Decimal,
    counter_precision: u32,
) -> Result<Decimal, AmountError> {
    require_positive(truncate(
        counter_amount * (Decimal::ONE + slippage),
        counter_precision,
    ))
}
