//! Session lifecycle rules.
//!
//! The service decides; repositories persist. Closing folds exactly the
//! movements the repository read inside its close transaction.

use kasa_shared::ReconciliationMode;
use kasa_shared::types::has_money_scale;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::SessionError;
use super::types::{CloseOutcome, CloseSessionInput, OpenSessionInput, SessionSnapshot, SessionStatus};
use crate::ledger::{
    BalanceLine, Direction, MovementCategory, PostMovementInput, SessionBalance, SourceKind,
    SourceRef,
};
use crate::reconciliation::ReconciliationEngine;

/// Stateless session lifecycle service.
pub struct SessionService;

impl SessionService {
    /// Validates an opening request.
    ///
    /// # Errors
    ///
    /// Returns `NegativeOpeningAmount` or `ExcessivePrecision`.
    pub fn validate_opening(input: &OpenSessionInput) -> Result<(), SessionError> {
        if input.opening_amount.is_sign_negative() && !input.opening_amount.is_zero() {
            return Err(SessionError::NegativeOpeningAmount(input.opening_amount));
        }
        if !has_money_scale(input.opening_amount) {
            return Err(SessionError::ExcessivePrecision(input.opening_amount));
        }
        Ok(())
    }

    /// Builds the SESSION_OPEN movement for a new session.
    ///
    /// Returns `None` for a zero float: no movement is posted.
    #[must_use]
    pub fn opening_movement(
        session_id: Uuid,
        operator_id: Uuid,
        opening_amount: Decimal,
    ) -> Option<PostMovementInput> {
        if opening_amount <= Decimal::ZERO {
            return None;
        }
        Some(PostMovementInput {
            direction: Direction::Inflow,
            category: MovementCategory::SessionOpen,
            amount: opening_amount,
            description: "Opening float".to_string(),
            operator_id,
            session_id: Some(session_id),
            source: Some(SourceRef::new(SourceKind::CashSession, session_id)),
            payment_method: Some("cash".to_string()),
            voucher: None,
        })
    }

    /// Fails unless the session is open.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed`.
    pub fn ensure_open(session_id: Uuid, status: SessionStatus) -> Result<(), SessionError> {
        if status.is_terminal() {
            return Err(SessionError::SessionClosed(session_id));
        }
        Ok(())
    }

    /// Computes the close of `session` over exactly `lines`.
    ///
    /// `lines` must be every movement attached to the session, read from
    /// the same snapshot in which the session row is locked.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed`, `NegativeDeclaredAmount`,
    /// `ExcessivePrecision`, `InvalidCount` for a count the arqueo cannot
    /// store, or a reconciliation error in strict mode.
    pub fn close(
        session: &SessionSnapshot,
        lines: &[BalanceLine],
        input: &CloseSessionInput,
        mode: ReconciliationMode,
    ) -> Result<CloseOutcome, SessionError> {
        Self::ensure_open(session.id, session.status)?;
        let declared = input.declared_amount;
        if declared.is_sign_negative() && !declared.is_zero() {
            return Err(SessionError::NegativeDeclaredAmount(declared));
        }
        if !has_money_scale(declared) {
            return Err(SessionError::ExcessivePrecision(declared));
        }

        if let Some(count) = &input.count {
            count.validate()?;
        }

        let balance = SessionBalance::compute(session.opening_amount, lines);
        let reconciliation = ReconciliationEngine::reconcile(
            balance.expected(),
            declared,
            input.count.as_ref(),
            mode,
        )?;

        Ok(CloseOutcome {
            balance,
            reconciliation,
        })
    }
}
