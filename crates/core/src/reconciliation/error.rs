//! Reconciliation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while reading a cash count or reconciling a close.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// Face value not present in the denomination table.
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(String),

    /// Count is negative or does not fit.
    #[error("Invalid count {count} for denomination {denomination}")]
    InvalidCount {
        /// Denomination label.
        denomination: String,
        /// The rejected count.
        count: i64,
    },

    /// The same denomination appears twice (e.g. `0.5` and `0.50`).
    #[error("Denomination {0} given more than once")]
    DuplicateDenomination(String),

    /// Cash count does not match the declared amount under strict mode.
    #[error("Cash count {counted} does not match declared amount {declared}")]
    CountMismatch {
        /// Total of the physical count.
        counted: Decimal,
        /// Amount declared by the operator.
        declared: Decimal,
    },
}

impl ReconciliationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownDenomination(_) => "UNKNOWN_DENOMINATION",
            Self::InvalidCount { .. } => "INVALID_COUNT",
            Self::DuplicateDenomination(_) => "DUPLICATE_DENOMINATION",
            Self::CountMismatch { .. } => "COUNT_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::CountMismatch { .. } => 422,
            _ => 400,
        }
    }
}
