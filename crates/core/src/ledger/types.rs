//! Movement ledger domain types.
//!
//! A movement is a single signed cash event. Its amount is always strictly
//! positive; the sign lives only in [`Direction`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Prefix that marks a category as the annulment of another category.
pub const ANNULMENT_PREFIX: &str = "ANNUL_";

/// Maximum length of a category tag, prefix included.
pub const MAX_CATEGORY_LEN: usize = 64;

/// Whether cash enters or leaves the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Cash received.
    Inflow,
    /// Cash paid out.
    Outflow,
}

impl Direction {
    /// Returns the direction that cancels this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Inflow => Self::Outflow,
            Self::Outflow => Self::Inflow,
        }
    }

    /// Applies the direction's sign to a positive amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Inflow => amount,
            Self::Outflow => -amount,
        }
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inflow" => Ok(Self::Inflow),
            "outflow" => Ok(Self::Outflow),
            _ => Err(LedgerError::InvalidDirection(s.to_string())),
        }
    }
}

/// Movement category tag.
///
/// Well-known tags get their own variant; anything else that is a valid tag
/// (upper-case ASCII letters, digits and underscores) is kept as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MovementCategory {
    /// Point-of-sale income.
    Sale,
    /// Stock purchase paid from the drawer.
    Purchase,
    /// Categorized expense.
    Expense,
    /// Employee payment.
    Payroll,
    /// Receivable installment collection.
    Installment,
    /// Opening float of a cash session.
    SessionOpen,
    /// Annulment of a movement of the wrapped category.
    Annulment(Box<MovementCategory>),
    /// Any other valid tag.
    Custom(String),
}

impl MovementCategory {
    /// Parses and validates a category tag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` for empty, over-long or malformed tags and
    /// for annulments of annulments.
    pub fn parse(tag: &str) -> Result<Self, LedgerError> {
        let tag = tag.trim();
        let well_formed = !tag.is_empty()
            && tag.len() <= MAX_CATEGORY_LEN
            && tag
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(LedgerError::InvalidCategory(tag.to_string()));
        }

        if let Some(inner) = tag.strip_prefix(ANNULMENT_PREFIX) {
            if inner.is_empty() || inner.starts_with(ANNULMENT_PREFIX) {
                return Err(LedgerError::InvalidCategory(tag.to_string()));
            }
            return Ok(Self::Annulment(Box::new(Self::parse(inner)?)));
        }

        Ok(match tag {
            "SALE" => Self::Sale,
            "PURCHASE" => Self::Purchase,
            "EXPENSE" => Self::Expense,
            "PAYROLL" => Self::Payroll,
            "INSTALLMENT" => Self::Installment,
            "SESSION_OPEN" => Self::SessionOpen,
            other => Self::Custom(other.to_string()),
        })
    }

    /// Returns the stored tag.
    #[must_use]
    pub fn as_tag(&self) -> String {
        match self {
            Self::Sale => "SALE".to_string(),
            Self::Purchase => "PURCHASE".to_string(),
            Self::Expense => "EXPENSE".to_string(),
            Self::Payroll => "PAYROLL".to_string(),
            Self::Installment => "INSTALLMENT".to_string(),
            Self::SessionOpen => "SESSION_OPEN".to_string(),
            Self::Annulment(inner) => format!("{ANNULMENT_PREFIX}{}", inner.as_tag()),
            Self::Custom(tag) => tag.clone(),
        }
    }

    /// Returns the annulment category for this one.
    #[must_use]
    pub fn annulled(&self) -> Self {
        Self::Annulment(Box::new(self.clone()))
    }

    /// Returns true for annulment categories.
    #[must_use]
    pub const fn is_annulment(&self) -> bool {
        matches!(self, Self::Annulment(_))
    }

    /// Returns true for categories only the ledger itself may post.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self, Self::SessionOpen | Self::Annulment(_))
    }
}

impl fmt::Display for MovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_tag())
    }
}

impl FromStr for MovementCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MovementCategory {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MovementCategory> for String {
    fn from(value: MovementCategory) -> Self {
        value.as_tag()
    }
}

/// Kind of record a movement points back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceKind {
    /// The session whose opening float produced the movement.
    CashSession,
    /// A reversed movement.
    Movement,
    /// An expense record.
    Expense,
    /// A payroll payment record.
    PayrollPayment,
    /// An installment payment.
    InstallmentPayment,
    /// A sale recorded by an external module.
    Sale,
    /// A purchase recorded by an external module.
    Purchase,
    /// Any other lower-case snake case kind.
    Other(String),
}

impl SourceKind {
    /// Returns the stored kind string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CashSession => "cash_session",
            Self::Movement => "movement",
            Self::Expense => "expense",
            Self::PayrollPayment => "payroll_payment",
            Self::InstallmentPayment => "installment_payment",
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Other(kind) => kind,
        }
    }

    /// Kinds whose movements only the ledger's own workflows may write.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::CashSession
                | Self::Movement
                | Self::Expense
                | Self::PayrollPayment
                | Self::InstallmentPayment
        )
    }

    /// Parses a stored kind string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceKind` unless the value is non-empty lower-case
    /// snake case of at most 32 characters.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let value = value.trim();
        let well_formed = !value.is_empty()
            && value.len() <= 32
            && value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(LedgerError::InvalidSourceKind(value.to_string()));
        }
        Ok(match value {
            "cash_session" => Self::CashSession,
            "movement" => Self::Movement,
            "expense" => Self::Expense,
            "payroll_payment" => Self::PayrollPayment,
            "installment_payment" => Self::InstallmentPayment,
            "sale" => Self::Sale,
            "purchase" => Self::Purchase,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SourceKind {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SourceKind> for String {
    fn from(value: SourceKind) -> Self {
        value.as_str().to_string()
    }
}

/// Back-reference from a movement to the record that caused it.
///
/// The `(kind, id)` pair is unique across the ledger, which is what makes a
/// repeated posting of the same business event detectable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Record kind.
    pub kind: SourceKind,
    /// Record identifier.
    pub id: Uuid,
}

impl SourceRef {
    /// Creates a source reference.
    #[must_use]
    pub const fn new(kind: SourceKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Input for posting a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMovementInput {
    /// Inflow or outflow.
    pub direction: Direction,
    /// Category tag.
    pub category: MovementCategory,
    /// Strictly positive amount.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Operator performing the posting.
    pub operator_id: Uuid,
    /// Explicit session; resolved from the operator when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Originating record.
    #[serde(default)]
    pub source: Option<SourceRef>,
    /// Payment method (cash, card, transfer...).
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Receipt or voucher number.
    #[serde(default)]
    pub voucher: Option<String>,
}

/// A validated movement ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementDraft {
    /// Inflow or outflow.
    pub direction: Direction,
    /// Category tag.
    pub category: MovementCategory,
    /// Strictly positive amount with at most two decimal places.
    pub amount: Decimal,
    /// Trimmed, non-empty description.
    pub description: String,
    /// Operator performing the posting.
    pub operator_id: Uuid,
    /// Explicit session, if the caller gave one.
    pub session_id: Option<Uuid>,
    /// Originating record.
    pub source: Option<SourceRef>,
    /// Trimmed payment method; blank becomes `None`.
    pub payment_method: Option<String>,
    /// Trimmed voucher; blank becomes `None`.
    pub voucher: Option<String>,
}

/// Half-open time window `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub from: DateTime<Utc>,
    /// Exclusive upper bound.
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `to` is before `from`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, LedgerError> {
        if to < from {
            return Err(LedgerError::InvalidDateRange);
        }
        Ok(Self { from, to })
    }

    /// Returns true if `at` falls inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at < self.to
    }
}

/// Filters for querying movements. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    /// Only movements of this session.
    pub session_id: Option<Uuid>,
    /// Only movements posted by this operator.
    pub operator_id: Option<Uuid>,
    /// Only movements inside this window.
    pub date_range: Option<DateRange>,
    /// Only movements with this category.
    pub category: Option<MovementCategory>,
    /// Only movements in this direction.
    pub direction: Option<Direction>,
    /// Only movements with this voucher.
    pub voucher: Option<String>,
    /// Only movements attached to no session.
    pub unassigned_only: bool,
}
