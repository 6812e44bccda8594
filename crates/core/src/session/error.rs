//! Cash session error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::reconciliation::ReconciliationError;

/// Errors of the session open/close lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Operator already has an open session.
    #[error("Operator {operator_id} already has an open cash session")]
    AlreadyOpen {
        /// The operator.
        operator_id: Uuid,
    },

    /// Operator has no open session to close.
    #[error("Operator {operator_id} has no open cash session")]
    NoOpenSession {
        /// The operator.
        operator_id: Uuid,
    },

    /// Session is closed and can no longer change.
    #[error("Cash session {0} is closed")]
    SessionClosed(Uuid),

    /// Session belongs to another operator's drawer.
    #[error("Cash session {session_id} does not belong to operator {operator_id}")]
    ForeignSession {
        /// The session.
        session_id: Uuid,
        /// The operator attempting to post into it.
        operator_id: Uuid,
    },

    /// Opening float below zero.
    #[error("Opening amount cannot be negative: {0}")]
    NegativeOpeningAmount(Decimal),

    /// Declared closing amount below zero.
    #[error("Declared amount cannot be negative: {0}")]
    NegativeDeclaredAmount(Decimal),

    /// Amount has more decimal places than the ledger scale.
    #[error("Amount {0} has more than two decimal places")]
    ExcessivePrecision(Decimal),

    /// Reconciliation rejected the close.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
}

impl SessionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyOpen { .. } => "SESSION_ALREADY_OPEN",
            Self::NoOpenSession { .. } => "NO_OPEN_SESSION",
            Self::SessionClosed(_) => "SESSION_CLOSED",
            Self::ForeignSession { .. } => "FOREIGN_SESSION",
            Self::NegativeOpeningAmount(_) => "NEGATIVE_OPENING_AMOUNT",
            Self::NegativeDeclaredAmount(_) => "NEGATIVE_DECLARED_AMOUNT",
            Self::ExcessivePrecision(_) => "EXCESSIVE_PRECISION",
            Self::Reconciliation(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AlreadyOpen { .. }
            | Self::SessionClosed(_)
            | Self::ForeignSession { .. } => 409,
            Self::NoOpenSession { .. } => 404,
            Self::NegativeOpeningAmount(_)
            | Self::NegativeDeclaredAmount(_)
            | Self::ExcessivePrecision(_) => 400,
            Self::Reconciliation(e) => e.http_status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_error_statuses() {
        let operator_id = Uuid::new_v4();
        assert_eq!(SessionError::AlreadyOpen { operator_id }.http_status_code(), 409);
        assert_eq!(SessionError::NoOpenSession { operator_id }.http_status_code(), 404);
        assert_eq!(SessionError::SessionClosed(Uuid::nil()).error_code(), "SESSION_CLOSED");
        let foreign = SessionError::ForeignSession {
            session_id: Uuid::nil(),
            operator_id,
        };
        assert_eq!(foreign.error_code(), "FOREIGN_SESSION");
        assert_eq!(foreign.http_status_code(), 409);
    }

    #[test]
    fn test_reconciliation_error_passes_through() {
        let err: SessionError = ReconciliationError::CountMismatch {
            counted: Decimal::new(310, 0),
            declared: Decimal::new(300, 0),
        }
        .into();
        assert_eq!(err.error_code(), "COUNT_MISMATCH");
        assert_eq!(err.http_status_code(), 422);
    }
}
