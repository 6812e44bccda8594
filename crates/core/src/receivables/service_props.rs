//! Property-based tests for installment application.
//!
//! - Property 1: paid never decreases
//! - Property 2: pending = max(total - paid, 0)
//! - Property 3: status only moves forward and is Paid iff pending is zero

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ReceivableError;
use super::service::ReceivableService;
use super::types::PlanStatus;

fn cents(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
    range.prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_installments_are_monotonic(
        total in cents(1..10_000_000),
        payments in prop::collection::vec(cents(1..2_000_000), 1..30),
    ) {
        let plan_id = Uuid::new_v4();
        let tolerance = Decimal::new(1, 2);
        let mut balance = ReceivableService::new_balance(total);

        for amount in payments {
            match ReceivableService::apply_installment(plan_id, &balance, amount, tolerance) {
                Ok(next) => {
                    prop_assert!(next.paid >= balance.paid);
                    prop_assert_eq!(next.paid, balance.paid + amount);
                    prop_assert_eq!(next.pending, (total - next.paid).max(Decimal::ZERO));
                    prop_assert!(balance.status.can_transition_to(next.status));
                    prop_assert_eq!(next.status == PlanStatus::Paid, next.pending.is_zero());
                    balance = next;
                }
                Err(ReceivableError::PlanAlreadyPaid(id)) => {
                    prop_assert_eq!(id, plan_id);
                    prop_assert_eq!(balance.status, PlanStatus::Paid);
                }
                Err(ReceivableError::Overpayment { pending, .. }) => {
                    prop_assert_eq!(pending, balance.pending);
                    prop_assert!(amount > balance.pending + tolerance);
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn prop_paid_never_exceeds_total_beyond_tolerance(
        total in cents(1..1_000_000),
        payments in prop::collection::vec(cents(1..200_000), 1..30),
    ) {
        let tolerance = Decimal::new(1, 2);
        let mut balance = ReceivableService::new_balance(total);
        for amount in payments {
            if let Ok(next) = ReceivableService::apply_installment(Uuid::nil(), &balance, amount, tolerance) {
                balance = next;
            }
        }
        prop_assert!(balance.paid <= total + tolerance);
    }
}
