//! Field-level validation for movement postings.

use kasa_shared::types::has_money_scale;
use rust_decimal::Decimal;

use super::error::LedgerError;

/// Maximum stored description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Validates a movement amount: strictly positive, at most two decimals.
///
/// # Errors
///
/// Returns `ZeroAmount`, `NegativeAmount` or `ExcessivePrecision`.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    if !has_money_scale(amount) {
        return Err(LedgerError::ExcessivePrecision(amount));
    }
    Ok(())
}

/// Trims a description and checks it is non-empty and not too long.
///
/// # Errors
///
/// Returns `EmptyDescription` or `DescriptionTooLong`.
pub fn normalize_description(description: &str) -> Result<String, LedgerError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::EmptyDescription);
    }
    let len = trimmed.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::DescriptionTooLong(len));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field, mapping blank values to `None`.
#[must_use]
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
