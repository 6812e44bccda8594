//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every transaction in the system is opened here.

pub mod cash_session;
pub mod directory;
pub mod expense;
pub mod movement;
pub mod payroll;
mod posting;
pub mod receivable;

pub use cash_session::{
    CashSessionRepository, ClosedSession, SessionDetail, SessionFilter, SessionSummary,
};
pub use directory::DirectoryRepository;
pub use expense::{ExpenseFilter, ExpenseRecord, ExpenseRepository};
pub use movement::MovementRepository;
pub use payroll::{PayrollRecord, PayrollRepository};
pub use receivable::{PlanDetail, ReceivableRepository, RegisteredInstallment};
