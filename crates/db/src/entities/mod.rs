//! `SeaORM` entity definitions.

pub mod cash_counts;
pub mod cash_sessions;
pub mod debtors;
pub mod employees;
pub mod expense_categories;
pub mod expenses;
pub mod installment_payments;
pub mod movements;
pub mod operators;
pub mod payment_plans;
pub mod payroll_payments;
pub mod sea_orm_active_enums;
