//! Core business logic for Kasa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Movements, balance folding, annulments
//! - `session` - Cash drawer session lifecycle and close computation
//! - `reconciliation` - Denomination counts and variance policy
//! - `receivables` - Payment plans and installment collection
//! - `disbursement` - Expense and payroll records that post through the ledger

pub mod disbursement;
pub mod ledger;
pub mod receivables;
pub mod reconciliation;
pub mod session;
