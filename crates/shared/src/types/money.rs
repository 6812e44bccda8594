//! Monetary amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` in a single ledger currency.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every ledger amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to the ledger scale using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount has no more decimal places than the ledger scale.
///
/// Trailing zeros do not count, so `10.500` is accepted.
#[must_use]
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
