//! Expense recorder and payroll disbursement ledger.
//!
//! Every expense and payroll payment owns exactly one OUTFLOW movement that
//! points back at it. Corrections rewrite that movement; deletion removes it.

pub mod types;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::ledger::{
    Direction, LedgerError, LedgerService, MovementCategory, MovementDraft, PostMovementInput,
    SourceKind, SourceRef,
};

pub use types::{ExpenseDetails, ExpenseUpdate, PayrollDetails, PayrollUpdate};

/// Errors of expense and payroll recording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisbursementError {
    /// Pay period ends before it starts.
    #[error("Pay period end {end} is before its start {start}")]
    InvalidPayPeriod {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    /// The linked movement failed validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The linked movement sits in a closed session; post an annulment instead.
    #[error("Record {record_id} belongs to closed cash session {session_id}")]
    RecordInClosedSession {
        /// The expense or payroll record.
        record_id: Uuid,
        /// The closed session.
        session_id: Uuid,
    },

    /// The linked movement was annulled; the record is frozen with it.
    #[error("Record {record_id} was reversed by annulment of movement {movement_id}")]
    RecordReversed {
        /// The expense or payroll record.
        record_id: Uuid,
        /// The annulled movement.
        movement_id: Uuid,
    },
}

impl DisbursementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPayPeriod { .. } => "INVALID_PAY_PERIOD",
            Self::Ledger(e) => e.error_code(),
            Self::RecordInClosedSession { .. } => "RECORD_IN_CLOSED_SESSION",
            Self::RecordReversed { .. } => "RECORD_REVERSED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidPayPeriod { .. } => 400,
            Self::Ledger(e) => e.http_status_code(),
            Self::RecordInClosedSession { .. } | Self::RecordReversed { .. } => 409,
        }
    }
}

/// A record that posts one OUTFLOW movement through the ledger.
pub trait LedgerLinked {
    /// Source kind stored on the linked movement.
    fn source_kind() -> SourceKind;

    /// Category of the linked movement.
    fn category() -> MovementCategory;

    /// Amount of the linked movement.
    fn amount(&self) -> Decimal;

    /// Description of the linked movement.
    fn movement_description(&self) -> String;

    /// Payment method of the linked movement.
    fn payment_method(&self) -> Option<&str>;

    /// Voucher of the linked movement.
    fn voucher(&self) -> Option<&str>;

    /// Record-specific checks beyond the movement's own validation.
    ///
    /// # Errors
    ///
    /// Returns a `DisbursementError` describing the first violation.
    fn validate(&self) -> Result<(), DisbursementError> {
        Ok(())
    }
}

impl LedgerLinked for ExpenseDetails {
    fn source_kind() -> SourceKind {
        SourceKind::Expense
    }

    fn category() -> MovementCategory {
        MovementCategory::Expense
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn movement_description(&self) -> String {
        self.description.clone()
    }

    fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    fn voucher(&self) -> Option<&str> {
        self.voucher.as_deref()
    }
}

impl LedgerLinked for PayrollDetails {
    fn source_kind() -> SourceKind {
        SourceKind::PayrollPayment
    }

    fn category() -> MovementCategory {
        MovementCategory::Payroll
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn movement_description(&self) -> String {
        format!(
            "Payroll: {} ({} to {})",
            self.concept.trim(),
            self.period_start,
            self.period_end
        )
    }

    fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    fn voucher(&self) -> Option<&str> {
        self.voucher.as_deref()
    }

    fn validate(&self) -> Result<(), DisbursementError> {
        if self.concept.trim().is_empty() {
            return Err(LedgerError::EmptyDescription.into());
        }
        if self.period_end < self.period_start {
            return Err(DisbursementError::InvalidPayPeriod {
                start: self.period_start,
                end: self.period_end,
            });
        }
        Ok(())
    }
}

/// Builds and validates the OUTFLOW movement owned by `record`.
///
/// # Errors
///
/// Returns the record's own validation error or the ledger's.
pub fn linked_movement<R: LedgerLinked>(
    record: &R,
    record_id: Uuid,
    operator_id: Uuid,
) -> Result<MovementDraft, DisbursementError> {
    record.validate()?;
    let input = PostMovementInput {
        direction: Direction::Outflow,
        category: R::category(),
        amount: record.amount(),
        description: record.movement_description(),
        operator_id,
        session_id: None,
        source: Some(SourceRef::new(R::source_kind(), record_id)),
        payment_method: record.payment_method().map(str::to_string),
        voucher: record.voucher().map(str::to_string),
    };
    Ok(LedgerService::prepare(&input)?)
}
