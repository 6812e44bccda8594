//! Application-wide error types.
//!
//! Every failure the cash ledger can report falls into one of these buckets.
//! Lower layers keep their own precise enums and convert into `AppError` at
//! the boundary.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// The flavour of a storage-level integrity violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
    /// A uniqueness constraint rejected the write.
    DuplicateKey,
    /// A foreign key pointed at a row that does not exist.
    DanglingReference,
}

impl IntegrityKind {
    /// Returns the stable error code for this kind.
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::DuplicateKey => "DUPLICATE_KEY",
            Self::DanglingReference => "DANGLING_REFERENCE",
        }
    }
}

impl std::fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "duplicate key"),
            Self::DanglingReference => write!(f, "dangling reference"),
        }
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict with the current state (e.g., a session is already open).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage-level integrity violation, surfaced as a conflict.
    #[error("Integrity violation ({kind}): {detail}")]
    Integrity {
        /// Duplicate key or dangling reference.
        kind: IntegrityKind,
        /// Constraint detail reported by the store.
        detail: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) | Self::Integrity { .. } => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Integrity { kind, .. } => kind.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors the caller caused and can fix by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
