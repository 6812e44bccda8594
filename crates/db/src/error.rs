//! Repository error type shared by every repository in this crate.

use kasa_core::disbursement::DisbursementError;
use kasa_core::ledger::LedgerError;
use kasa_core::receivables::ReceivableError;
use kasa_core::reconciliation::ReconciliationError;
use kasa_core::session::SessionError;
use kasa_shared::{AppError, IntegrityKind};
use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

/// Errors returned by repositories.
///
/// Domain rule violations are detected before any write and arrive here
/// wrapped; storage constraint violations are classified from the driver
/// error so callers can tell a duplicate posting from a missing reference.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Row not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Requested id.
        id: Uuid,
    },

    /// Posting needs an open session but the operator has none.
    #[error("Operator {operator_id} has no open cash session and unassigned movements are disabled")]
    UnassignedNotAllowed {
        /// The operator.
        operator_id: Uuid,
    },

    /// Movement was already annulled.
    #[error("Movement {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// Unique or foreign key constraint rejected the write.
    #[error("Integrity violation ({kind}): {detail}")]
    Integrity {
        /// Duplicate key or dangling reference.
        kind: IntegrityKind,
        /// Driver message.
        detail: String,
    },

    /// Stored value could not be mapped back into a domain type.
    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    /// Movement rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Session lifecycle violation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Cash count violation.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    /// Payment plan violation.
    #[error(transparent)]
    Receivable(#[from] ReceivableError),

    /// Expense or payroll violation.
    #[error(transparent)]
    Disbursement(#[from] DisbursementError),

    /// Any other database error.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Integrity {
                kind: IntegrityKind::DuplicateKey,
                detail,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => Self::Integrity {
                kind: IntegrityKind::DanglingReference,
                detail,
            },
            _ => Self::Database(err),
        }
    }
}

impl RepositoryError {
    /// Shorthand for a missing row.
    #[must_use]
    pub const fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns true for a unique constraint violation.
    #[must_use]
    pub const fn is_duplicate_key(&self) -> bool {
        matches!(
            self,
            Self::Integrity {
                kind: IntegrityKind::DuplicateKey,
                ..
            }
        )
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnassignedNotAllowed { .. } => "NO_OPEN_SESSION",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::Integrity { kind, .. } => kind.error_code(),
            Self::Corrupt(_) => "CORRUPT_DATA",
            Self::Ledger(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Reconciliation(e) => e.error_code(),
            Self::Receivable(e) => e.error_code(),
            Self::Disbursement(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::UnassignedNotAllowed { .. } | Self::AlreadyReversed(_) | Self::Integrity { .. } => 409,
            Self::Corrupt(_) | Self::Database(_) => 500,
            Self::Ledger(e) => e.http_status_code(),
            Self::Session(e) => e.http_status_code(),
            Self::Reconciliation(e) => e.http_status_code(),
            Self::Receivable(e) => e.http_status_code(),
            Self::Disbursement(e) => e.http_status_code(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        let status = err.http_status_code();
        match err {
            RepositoryError::Integrity { kind, detail } => Self::Integrity { kind, detail },
            RepositoryError::Database(e) => Self::Database(e.to_string()),
            RepositoryError::Corrupt(msg) => Self::Internal(msg),
            other => {
                let message = other.to_string();
                match status {
                    404 => Self::NotFound(message),
                    409 => Self::Conflict(message),
                    422 => Self::BusinessRule(message),
                    400 => Self::Validation(message),
                    _ => Self::Internal(message),
                }
            }
        }
    }
}
