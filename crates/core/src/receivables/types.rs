//! Payment plan domain types.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::SourceRef;

/// Collection state of a plan. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Nothing collected yet.
    Pending,
    /// Partially collected.
    Partial,
    /// Fully collected.
    Paid,
}

impl PlanStatus {
    /// Position in the forward-only lifecycle.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Partial => 1,
            Self::Paid => 2,
        }
    }

    /// Returns true if moving to `next` does not go backwards.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        next.rank() >= self.rank()
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amounts and status of a plan.
///
/// `pending = max(total - paid, 0)` and the status is `Paid` iff pending is
/// zero. `paid` may exceed `total` by at most the overpayment tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanBalance {
    /// Amount owed in total.
    pub total: Decimal,
    /// Collected so far.
    pub paid: Decimal,
    /// Still owed.
    pub pending: Decimal,
    /// Collection state.
    pub status: PlanStatus,
}

/// Input for creating a payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePlanInput {
    /// Debtor owing the amount.
    pub debtor_id: Uuid,
    /// Total owed.
    pub total_amount: Decimal,
    /// Date the plan falls due.
    pub due_date: NaiveDate,
    /// Date the plan was issued; defaults to today.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Business record the debt comes from (an enrollment, a sale...).
    #[serde(default)]
    pub origin: Option<SourceRef>,
}

/// Input for registering one installment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallmentInput {
    /// Amount collected.
    pub amount: Decimal,
    /// Payment method (cash, card, transfer...).
    pub payment_method: String,
    /// Receipt or voucher number, unique within the plan.
    #[serde(default)]
    pub reference: Option<String>,
    /// Operator collecting the payment.
    pub operator_id: Uuid,
}
