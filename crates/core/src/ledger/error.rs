//! Ledger error types for movement validation and annulment rules.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while preparing or reversing movements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Amount Errors ==========
    /// Movement amount cannot be zero.
    #[error("Movement amount cannot be zero")]
    ZeroAmount,

    /// Movement amount cannot be negative; direction carries the sign.
    #[error("Movement amount cannot be negative")]
    NegativeAmount,

    /// Amount has more decimal places than the ledger scale.
    #[error("Amount {0} has more than two decimal places")]
    ExcessivePrecision(Decimal),

    // ========== Field Errors ==========
    /// Description is empty after trimming.
    #[error("Movement description cannot be empty")]
    EmptyDescription,

    /// Description exceeds the stored length.
    #[error("Movement description is too long ({0} characters, max 500)")]
    DescriptionTooLong(usize),

    /// Category tag is empty or contains characters outside `A-Z0-9_`.
    #[error("Invalid movement category: {0:?}")]
    InvalidCategory(String),

    /// Source kind is empty or malformed.
    #[error("Invalid source kind: {0:?}")]
    InvalidSourceKind(String),

    /// Category may only be posted by the ledger itself.
    #[error("Category {0} is reserved and cannot be posted directly")]
    ReservedCategory(String),

    /// Source kind belongs to a record the ledger owns.
    #[error("Source kind {0} is reserved and cannot be posted directly")]
    ReservedSource(String),

    /// Unknown direction string.
    #[error("Invalid movement direction: {0:?}")]
    InvalidDirection(String),

    /// Date range end is before its start.
    #[error("Date range end is before its start")]
    InvalidDateRange,

    // ========== Annulment Errors ==========
    /// An annulment cannot itself be annulled.
    #[error("Movement {0} is an annulment and cannot be reversed")]
    CannotReverseAnnulment(Uuid),

    /// The opening float is part of the session itself, not a reversible event.
    #[error("Movement {0} records a session opening and cannot be reversed")]
    CannotReverseSessionOpening(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ExcessivePrecision(_) => "EXCESSIVE_PRECISION",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::DescriptionTooLong(_) => "DESCRIPTION_TOO_LONG",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::InvalidSourceKind(_) => "INVALID_SOURCE_KIND",
            Self::ReservedCategory(_) => "RESERVED_CATEGORY",
            Self::ReservedSource(_) => "RESERVED_SOURCE",
            Self::InvalidDirection(_) => "INVALID_DIRECTION",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::CannotReverseAnnulment(_) => "CANNOT_REVERSE_ANNULMENT",
            Self::CannotReverseSessionOpening(_) => "CANNOT_REVERSE_SESSION_OPENING",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::CannotReverseAnnulment(_) | Self::CannotReverseSessionOpening(_) => 409,
            _ => 400,
        }
    }
}
