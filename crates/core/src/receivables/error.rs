//! Receivables error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::PlanStatus;

/// Errors of payment plans and installment collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceivableError {
    /// Plan is fully paid; no more installments are accepted.
    #[error("Payment plan {0} is already paid")]
    PlanAlreadyPaid(Uuid),

    /// Plan total must be positive.
    #[error("Plan total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// Installment amount must be positive.
    #[error("Installment amount must be positive, got {0}")]
    NonPositiveInstallment(Decimal),

    /// Amount has more decimal places than the ledger scale.
    #[error("Amount {0} has more than two decimal places")]
    ExcessivePrecision(Decimal),

    /// Due date precedes the issue date.
    #[error("Due date {due} is before issue date {issue}")]
    DueBeforeIssue {
        /// Issue date.
        issue: NaiveDate,
        /// Due date.
        due: NaiveDate,
    },

    /// Installment exceeds the pending balance beyond the tolerance.
    #[error("Installment {amount} exceeds pending balance {pending}")]
    Overpayment {
        /// Installment amount.
        amount: Decimal,
        /// Pending balance before the installment.
        pending: Decimal,
    },

    /// A plan status may only move forward.
    #[error("Plan status cannot go from {from} to {to}")]
    StatusRegression {
        /// Current status.
        from: PlanStatus,
        /// Rejected status.
        to: PlanStatus,
    },
}

impl ReceivableError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PlanAlreadyPaid(_) => "PLAN_ALREADY_PAID",
            Self::NonPositiveTotal(_) => "NON_POSITIVE_TOTAL",
            Self::NonPositiveInstallment(_) => "NON_POSITIVE_INSTALLMENT",
            Self::ExcessivePrecision(_) => "EXCESSIVE_PRECISION",
            Self::DueBeforeIssue { .. } => "DUE_BEFORE_ISSUE",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::StatusRegression { .. } => "STATUS_REGRESSION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PlanAlreadyPaid(_) => 409,
            Self::StatusRegression { .. } => 422,
            _ => 400,
        }
    }
}
