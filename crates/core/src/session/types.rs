//! Cash session domain types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::SessionBalance;
use crate::reconciliation::{CashCount, ReconciliationOutcome};

/// Lifecycle state of a cash session. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting movements.
    Open,
    /// Reconciled and immutable.
    Closed,
}

impl SessionStatus {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Returns true if the session can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for opening a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenSessionInput {
    /// Operator opening the drawer.
    pub operator_id: Uuid,
    /// Opening float, zero or more.
    pub opening_amount: Decimal,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for closing the operator's open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseSessionInput {
    /// Operator closing the drawer.
    pub operator_id: Uuid,
    /// Cash the operator declares to be in the drawer.
    pub declared_amount: Decimal,
    /// Closing notes.
    pub notes: Option<String>,
    /// Physical count, if one was taken.
    pub count: Option<CashCount>,
}

/// The stored state of a session needed to close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Session id.
    pub id: Uuid,
    /// Owning operator.
    pub operator_id: Uuid,
    /// Opening float.
    pub opening_amount: Decimal,
    /// Current status.
    pub status: SessionStatus,
}

/// Everything a repository must persist when a session closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseOutcome {
    /// Balance folded from the session's movements.
    pub balance: SessionBalance,
    /// Reconciliation of expected, declared and counted cash.
    pub reconciliation: ReconciliationOutcome,
}

impl CloseOutcome {
    /// Expected closing amount.
    #[must_use]
    pub const fn expected(&self) -> Decimal {
        self.reconciliation.expected
    }

    /// `declared - expected`.
    #[must_use]
    pub const fn variance(&self) -> Decimal {
        self.reconciliation.variance
    }
}
