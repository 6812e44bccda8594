//! Accounts receivable: payment plans collected in installments.
//!
//! Each collected installment is posted to the movement ledger as an
//! INSTALLMENT inflow pointing back at the installment record.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ReceivableError;
pub use service::ReceivableService;
pub use types::{CreatePlanInput, InstallmentInput, PlanBalance, PlanStatus};
