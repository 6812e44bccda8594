//! Annulment of posted movements.
//!
//! The ledger is append-only: a mistaken movement is cancelled by posting a
//! new one in the opposite direction whose category is prefixed with
//! `ANNUL_` and whose source points back at the original.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{Direction, MovementCategory, PostMovementInput, SourceKind, SourceRef};

/// The fields of a stored movement needed to annul it.
#[derive(Debug, Clone)]
pub struct ReversibleMovement {
    /// Movement being annulled.
    pub id: Uuid,
    /// Original direction.
    pub direction: Direction,
    /// Original category.
    pub category: MovementCategory,
    /// Original amount.
    pub amount: Decimal,
    /// Original payment method.
    pub payment_method: Option<String>,
    /// Original voucher.
    pub voucher: Option<String>,
}

/// Stateless service for building annulment postings.
pub struct ReversalService;

impl ReversalService {
    /// Builds the annulment posting for `original`.
    ///
    /// The annulment is attributed to `operator_id` and carries no explicit
    /// session, so it lands in that operator's open session when posted.
    ///
    /// # Errors
    ///
    /// Returns `CannotReverseAnnulment` or `CannotReverseSessionOpening`.
    pub fn annulment_for(
        original: &ReversibleMovement,
        operator_id: Uuid,
        reason: Option<&str>,
    ) -> Result<PostMovementInput, LedgerError> {
        match original.category {
            MovementCategory::Annulment(_) => {
                return Err(LedgerError::CannotReverseAnnulment(original.id));
            }
            MovementCategory::SessionOpen => {
                return Err(LedgerError::CannotReverseSessionOpening(original.id));
            }
            _ => {}
        }

        let description = match reason.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reason) => format!("Annulment of movement {}: {reason}", original.id),
            None => format!("Annulment of movement {}", original.id),
        };

        Ok(PostMovementInput {
            direction: original.direction.opposite(),
            category: original.category.annulled(),
            amount: original.amount,
            description,
            operator_id,
            session_id: None,
            source: Some(SourceRef::new(SourceKind::Movement, original.id)),
            payment_method: original.payment_method.clone(),
            voucher: original.voucher.clone(),
        })
    }
}
