//! Expense and payroll records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The business content of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDetails {
    /// Expense category from the reference catalog.
    pub category_id: Uuid,
    /// Amount paid out.
    pub amount: Decimal,
    /// What the money was spent on.
    pub description: String,
    /// Date of the expense.
    pub expense_date: NaiveDate,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Receipt or invoice number.
    #[serde(default)]
    pub voucher: Option<String>,
}

/// Partial correction of an expense. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExpenseUpdate {
    /// New category.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// New amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New date.
    #[serde(default)]
    pub expense_date: Option<NaiveDate>,
    /// New payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// New voucher.
    #[serde(default)]
    pub voucher: Option<String>,
}

impl ExpenseUpdate {
    /// Returns the corrected details.
    #[must_use]
    pub fn apply_to(&self, current: &ExpenseDetails) -> ExpenseDetails {
        ExpenseDetails {
            category_id: self.category_id.unwrap_or(current.category_id),
            amount: self.amount.unwrap_or(current.amount),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            expense_date: self.expense_date.unwrap_or(current.expense_date),
            payment_method: self
                .payment_method
                .clone()
                .or_else(|| current.payment_method.clone()),
            voucher: self.voucher.clone().or_else(|| current.voucher.clone()),
        }
    }

    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The business content of a payroll payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDetails {
    /// Employee paid.
    pub employee_id: Uuid,
    /// Amount paid out.
    pub amount: Decimal,
    /// What the payment covers (salary, bonus...).
    pub concept: String,
    /// First day of the paid period.
    pub period_start: NaiveDate,
    /// Last day of the paid period.
    pub period_end: NaiveDate,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Receipt number.
    #[serde(default)]
    pub voucher: Option<String>,
}

/// Partial correction of a payroll payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PayrollUpdate {
    /// New amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New concept.
    #[serde(default)]
    pub concept: Option<String>,
    /// New period start.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// New period end.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    /// New payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// New voucher.
    #[serde(default)]
    pub voucher: Option<String>,
}

impl PayrollUpdate {
    /// Returns the corrected details. The employee never changes.
    #[must_use]
    pub fn apply_to(&self, current: &PayrollDetails) -> PayrollDetails {
        PayrollDetails {
            employee_id: current.employee_id,
            amount: self.amount.unwrap_or(current.amount),
            concept: self.concept.clone().unwrap_or_else(|| current.concept.clone()),
            period_start: self.period_start.unwrap_or(current.period_start),
            period_end: self.period_end.unwrap_or(current.period_end),
            payment_method: self
                .payment_method
                .clone()
                .or_else(|| current.payment_method.clone()),
            voucher: self.voucher.clone().or_else(|| current.voucher.clone()),
        }
    }

    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
