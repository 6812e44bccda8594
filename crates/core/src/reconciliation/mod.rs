//! Denomination-based reconciliation.
//!
//! Converts a physical cash count into a total and compares it with the
//! operator's declared amount and the ledger's expected amount. Stateless;
//! only invoked when a session is closed.

pub mod count;
pub mod denomination;
pub mod error;
pub mod policy;

pub use count::{CashCount, MAX_PIECES, compute_arqueo_total};
pub use denomination::{Denomination, DenominationTable};
pub use error::ReconciliationError;
pub use policy::{ReconciliationEngine, ReconciliationOutcome, VarianceStatus};
