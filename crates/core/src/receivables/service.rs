//! Receivables service: plan creation and installment application.

use chrono::NaiveDate;
use kasa_shared::types::has_money_scale;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ReceivableError;
use super::types::{CreatePlanInput, InstallmentInput, PlanBalance, PlanStatus};
use crate::ledger::{Direction, MovementCategory, PostMovementInput, SourceKind, SourceRef};

/// Stateless receivables service.
pub struct ReceivableService;

impl ReceivableService {
    /// Validates a new plan issued on `issue_date`.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveTotal`, `ExcessivePrecision` or `DueBeforeIssue`.
    pub fn validate_plan(input: &CreatePlanInput, issue_date: NaiveDate) -> Result<(), ReceivableError> {
        if input.total_amount <= Decimal::ZERO {
            return Err(ReceivableError::NonPositiveTotal(input.total_amount));
        }
        if !has_money_scale(input.total_amount) {
            return Err(ReceivableError::ExcessivePrecision(input.total_amount));
        }
        if input.due_date < issue_date {
            return Err(ReceivableError::DueBeforeIssue {
                issue: issue_date,
                due: input.due_date,
            });
        }
        Ok(())
    }

    /// Balance of a freshly created plan.
    #[must_use]
    pub fn new_balance(total: Decimal) -> PlanBalance {
        PlanBalance {
            total,
            paid: Decimal::ZERO,
            pending: total,
            status: PlanStatus::Pending,
        }
    }

    /// Applies one installment to a plan balance.
    ///
    /// An installment may exceed the pending amount by at most `tolerance`;
    /// pending then clamps at zero.
    ///
    /// # Errors
    ///
    /// Returns `PlanAlreadyPaid`, `NonPositiveInstallment`,
    /// `ExcessivePrecision` or `Overpayment`.
    pub fn apply_installment(
        plan_id: Uuid,
        balance: &PlanBalance,
        amount: Decimal,
        tolerance: Decimal,
    ) -> Result<PlanBalance, ReceivableError> {
        if balance.status == PlanStatus::Paid {
            return Err(ReceivableError::PlanAlreadyPaid(plan_id));
        }
        if amount <= Decimal::ZERO {
            return Err(ReceivableError::NonPositiveInstallment(amount));
        }
        if !has_money_scale(amount) {
            return Err(ReceivableError::ExcessivePrecision(amount));
        }
        if amount > balance.pending + tolerance.max(Decimal::ZERO) {
            return Err(ReceivableError::Overpayment {
                amount,
                pending: balance.pending,
            });
        }

        let paid = balance.paid + amount;
        let pending = (balance.total - paid).max(Decimal::ZERO);
        let status = if pending.is_zero() {
            PlanStatus::Paid
        } else {
            PlanStatus::Partial
        };
        if !balance.status.can_transition_to(status) {
            return Err(ReceivableError::StatusRegression {
                from: balance.status,
                to: status,
            });
        }

        Ok(PlanBalance {
            total: balance.total,
            paid,
            pending,
            status,
        })
    }

    /// Builds the INSTALLMENT inflow posted alongside an installment.
    #[must_use]
    pub fn installment_movement(
        installment_id: Uuid,
        plan_id: Uuid,
        debtor_name: &str,
        input: &InstallmentInput,
    ) -> PostMovementInput {
        PostMovementInput {
            direction: Direction::Inflow,
            category: MovementCategory::Installment,
            amount: input.amount,
            description: format!("Installment from {debtor_name} (plan {plan_id})"),
            operator_id: input.operator_id,
            session_id: None,
            source: Some(SourceRef::new(SourceKind::InstallmentPayment, installment_id)),
            payment_method: Some(input.payment_method.clone()),
            voucher: input.reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tolerance() -> Decimal {
        dec!(0.01)
    }

    fn plan_input(total: Decimal, due: NaiveDate) -> CreatePlanInput {
        CreatePlanInput {
            debtor_id: Uuid::new_v4(),
            total_amount: total,
            due_date: due,
            issue_date: None,
            notes: None,
            origin: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_installments_to_completion() {
        let plan_id = Uuid::new_v4();
        let balance = ReceivableService::new_balance(dec!(300));
        assert_eq!(balance.status, PlanStatus::Pending);

        let balance = ReceivableService::apply_installment(plan_id, &balance, dec!(100), tolerance()).unwrap();
        assert_eq!(balance.status, PlanStatus::Partial);
        assert_eq!(balance.pending, dec!(200));
        assert_eq!(balance.paid, dec!(100));

        let balance = ReceivableService::apply_installment(plan_id, &balance, dec!(200), tolerance()).unwrap();
        assert_eq!(balance.status, PlanStatus::Paid);
        assert_eq!(balance.pending, Decimal::ZERO);

        let third = ReceivableService::apply_installment(plan_id, &balance, dec!(1), tolerance());
        assert_eq!(third, Err(ReceivableError::PlanAlreadyPaid(plan_id)));
    }

    #[test]
    fn test_overpayment_guard() {
        let plan_id = Uuid::new_v4();
        let balance = ReceivableService::new_balance(dec!(50));

        let within = ReceivableService::apply_installment(plan_id, &balance, dec!(50.01), tolerance()).unwrap();
        assert_eq!(within.pending, Decimal::ZERO);
        assert_eq!(within.status, PlanStatus::Paid);

        let beyond = ReceivableService::apply_installment(plan_id, &balance, dec!(50.02), tolerance());
        assert_eq!(
            beyond,
            Err(ReceivableError::Overpayment {
                amount: dec!(50.02),
                pending: dec!(50),
            })
        );
    }

    #[test]
    fn test_non_positive_installment() {
        let balance = ReceivableService::new_balance(dec!(50));
        assert!(matches!(
            ReceivableService::apply_installment(Uuid::new_v4(), &balance, dec!(0), tolerance()),
            Err(ReceivableError::NonPositiveInstallment(_))
        ));
    }

    #[test]
    fn test_validate_plan() {
        let issue = date(2026, 1, 10);
        assert!(ReceivableService::validate_plan(&plan_input(dec!(300), date(2026, 2, 10)), issue).is_ok());
        assert_eq!(
            ReceivableService::validate_plan(&plan_input(dec!(0), date(2026, 2, 10)), issue),
            Err(ReceivableError::NonPositiveTotal(dec!(0)))
        );
        assert!(matches!(
            ReceivableService::validate_plan(&plan_input(dec!(10), date(2026, 1, 9)), issue),
            Err(ReceivableError::DueBeforeIssue { .. })
        ));
    }

    #[test]
    fn test_installment_movement() {
        let installment_id = Uuid::new_v4();
        let input = InstallmentInput {
            amount: dec!(100),
            payment_method: "cash".into(),
            reference: Some("REC-7".into()),
            operator_id: Uuid::new_v4(),
        };
        let movement =
            ReceivableService::installment_movement(installment_id, Uuid::new_v4(), "Ana", &input);
        assert_eq!(movement.category, MovementCategory::Installment);
        assert_eq!(movement.direction, Direction::Inflow);
        assert_eq!(movement.voucher.as_deref(), Some("REC-7"));
        assert_eq!(
            movement.source,
            Some(SourceRef::new(SourceKind::InstallmentPayment, installment_id))
        );
    }

    #[test]
    fn test_status_transitions() {
        assert!(PlanStatus::Pending.can_transition_to(PlanStatus::Partial));
        assert!(PlanStatus::Partial.can_transition_to(PlanStatus::Paid));
        assert!(!PlanStatus::Paid.can_transition_to(PlanStatus::Partial));
        assert!(!PlanStatus::Partial.can_transition_to(PlanStatus::Pending));
    }
}
