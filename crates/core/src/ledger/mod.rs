//! Movement ledger logic.
//!
//! This module implements the append-only cash ledger:
//! - Movement types, categories and source references
//! - Field validation for postings
//! - Session balance folding and per-category summaries
//! - Annulment of posted movements
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use balance::{BalanceLine, CategoryTotal, SessionBalance, summarize_by_category};
pub use error::LedgerError;
pub use reversal::{ReversalService, ReversibleMovement};
pub use service::LedgerService;
pub use types::{
    ANNULMENT_PREFIX, DateRange, Direction, MovementCategory, MovementDraft, MovementFilter,
    PostMovementInput, SourceKind, SourceRef,
};
