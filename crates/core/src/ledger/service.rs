//! Ledger service: turns posting inputs into validated drafts.
//!
//! Pure business logic with no database dependencies. Repositories call
//! into it before opening a transaction so that validation errors are
//! raised before anything is mutated.

use super::error::LedgerError;
use super::types::{MovementDraft, PostMovementInput};
use super::validation::{normalize_description, normalize_optional, validate_amount};

/// Stateless validation entry point for movement postings.
pub struct LedgerService;

impl LedgerService {
    /// Validates a posting coming from the ledger's own workflows.
    ///
    /// # Errors
    ///
    /// Returns the first field error found.
    pub fn prepare(input: &PostMovementInput) -> Result<MovementDraft, LedgerError> {
        validate_amount(input.amount)?;
        let description = normalize_description(&input.description)?;

        Ok(MovementDraft {
            direction: input.direction,
            category: input.category.clone(),
            amount: input.amount,
            description,
            operator_id: input.operator_id,
            session_id: input.session_id,
            source: input.source.clone(),
            payment_method: normalize_optional(input.payment_method.as_deref()),
            voucher: normalize_optional(input.voucher.as_deref()),
        })
    }

    /// Validates a posting coming from another module (sales, purchases...).
    ///
    /// Same as [`prepare`](Self::prepare) but refuses the categories and
    /// source kinds the ledger reserves for itself. A forged `movement`
    /// source would otherwise take the slot of the real annulment.
    ///
    /// # Errors
    ///
    /// Returns `ReservedCategory`, `ReservedSource` or any field error.
    pub fn prepare_external(input: &PostMovementInput) -> Result<MovementDraft, LedgerError> {
        if input.category.is_reserved() {
            return Err(LedgerError::ReservedCategory(input.category.as_tag()));
        }
        if let Some(source) = input.source.as_ref().filter(|s| s.kind.is_reserved()) {
            return Err(LedgerError::ReservedSource(source.kind.as_str().to_string()));
        }
        Self::prepare(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{Direction, MovementCategory, SourceKind, SourceRef};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn input(category: MovementCategory) -> PostMovementInput {
        PostMovementInput {
            direction: Direction::Inflow,
            category,
            amount: dec!(50),
            description: " Ticket 42 ".to_string(),
            operator_id: Uuid::new_v4(),
            session_id: None,
            source: Some(SourceRef::new(SourceKind::Sale, Uuid::new_v4())),
            payment_method: Some("cash".to_string()),
            voucher: Some(String::new()),
        }
    }

    #[test]
    fn test_prepare_normalizes_fields() {
        let draft = LedgerService::prepare(&input(MovementCategory::Sale)).unwrap();
        assert_eq!(draft.description, "Ticket 42");
        assert_eq!(draft.payment_method.as_deref(), Some("cash"));
        assert_eq!(draft.voucher, None);
        assert_eq!(draft.amount, dec!(50));
    }

    #[test]
    fn test_prepare_rejects_zero_amount() {
        let mut bad = input(MovementCategory::Sale);
        bad.amount = dec!(0);
        assert_eq!(LedgerService::prepare(&bad), Err(LedgerError::ZeroAmount));
    }

    #[test]
    fn test_external_rejects_reserved_categories() {
        let result = LedgerService::prepare_external(&input(MovementCategory::SessionOpen));
        assert_eq!(
            result,
            Err(LedgerError::ReservedCategory("SESSION_OPEN".to_string()))
        );

        let annul = MovementCategory::Sale.annulled();
        assert!(LedgerService::prepare_external(&input(annul.clone())).is_err());
        assert!(LedgerService::prepare(&input(annul)).is_ok());
    }

    #[test]
    fn test_external_rejects_reserved_sources() {
        let mut forged = input(MovementCategory::Sale);
        forged.source = Some(SourceRef::new(SourceKind::Movement, Uuid::new_v4()));
        assert_eq!(
            LedgerService::prepare_external(&forged),
            Err(LedgerError::ReservedSource("movement".to_string()))
        );

        for kind in [
            SourceKind::CashSession,
            SourceKind::Expense,
            SourceKind::PayrollPayment,
            SourceKind::InstallmentPayment,
        ] {
            forged.source = Some(SourceRef::new(kind, Uuid::new_v4()));
            assert!(LedgerService::prepare_external(&forged).is_err());
        }

        forged.source = Some(SourceRef::new(SourceKind::Purchase, Uuid::new_v4()));
        assert!(LedgerService::prepare_external(&forged).is_ok());
        forged.source = Some(SourceRef::new(SourceKind::Movement, Uuid::new_v4()));
        assert!(LedgerService::prepare(&forged).is_ok());
    }
}
