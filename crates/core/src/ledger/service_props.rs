//! Property-based tests for movement validation and session balances.
//!
//! - Property 1: Positive two-decimal amounts are always accepted
//! - Property 2: Balance equals opening plus signed movements
//! - Property 3: An annulment always cancels its original

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::{BalanceLine, SessionBalance};
use super::error::LedgerError;
use super::reversal::{ReversalService, ReversibleMovement};
use super::service::LedgerService;
use super::types::{Direction, MovementCategory, PostMovementInput};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Inflow), Just(Direction::Outflow)]
}

fn category_strategy() -> impl Strategy<Value = MovementCategory> {
    prop_oneof![
        Just(MovementCategory::Sale),
        Just(MovementCategory::Purchase),
        Just(MovementCategory::Expense),
        Just(MovementCategory::Payroll),
        Just(MovementCategory::Installment),
    ]
}

fn line_strategy() -> impl Strategy<Value = BalanceLine> {
    (direction_strategy(), category_strategy(), positive_amount()).prop_map(
        |(direction, category, amount)| BalanceLine {
            direction,
            category,
            amount,
        },
    )
}

fn make_input(amount: Decimal) -> PostMovementInput {
    PostMovementInput {
        direction: Direction::Inflow,
        category: MovementCategory::Sale,
        amount,
        description: "Sale".to_string(),
        operator_id: Uuid::new_v4(),
        session_id: None,
        source: None,
        payment_method: None,
        voucher: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1.1: every positive amount with two decimals is accepted.
    #[test]
    fn prop_positive_amount_accepted(amount in positive_amount()) {
        let draft = LedgerService::prepare(&make_input(amount));
        prop_assert!(draft.is_ok());
        prop_assert_eq!(draft.unwrap().amount, amount);
    }

    /// Property 1.2: non-positive amounts are rejected before anything else.
    #[test]
    fn prop_non_positive_amount_rejected(cents in -1_000_000i64..=0i64) {
        let result = LedgerService::prepare(&make_input(Decimal::new(cents, 2)));
        prop_assert!(matches!(
            result,
            Err(LedgerError::ZeroAmount | LedgerError::NegativeAmount)
        ));
    }

    /// Property 2.1: expected balance is the opening plus the signed sum.
    #[test]
    fn prop_expected_is_signed_sum(
        opening in (0i64..1_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        lines in prop::collection::vec(line_strategy(), 0..40),
    ) {
        let balance = SessionBalance::compute(opening, &lines);
        let signed: Decimal = lines
            .iter()
            .map(|l| l.direction.signed(l.amount))
            .sum();
        prop_assert_eq!(balance.expected(), opening + signed);
        prop_assert_eq!(balance.movement_count, lines.len() as u64);
    }

    /// Property 2.2: the opening movement never changes the expected balance.
    #[test]
    fn prop_opening_movement_is_neutral(
        opening in positive_amount(),
        lines in prop::collection::vec(line_strategy(), 0..20),
    ) {
        let without = SessionBalance::compute(opening, &lines).expected();
        let mut with_opening = vec![BalanceLine {
            direction: Direction::Inflow,
            category: MovementCategory::SessionOpen,
            amount: opening,
        }];
        with_opening.extend(lines);
        prop_assert_eq!(SessionBalance::compute(opening, &with_opening).expected(), without);
    }

    /// Property 3.1: original plus annulment nets to zero.
    #[test]
    fn prop_annulment_cancels_original(line in line_strategy()) {
        let original = ReversibleMovement {
            id: Uuid::new_v4(),
            direction: line.direction,
            category: line.category.clone(),
            amount: line.amount,
            payment_method: None,
            voucher: None,
        };
        let annul = ReversalService::annulment_for(&original, Uuid::new_v4(), None).unwrap();
        let lines = vec![
            line,
            BalanceLine {
                direction: annul.direction,
                category: annul.category,
                amount: annul.amount,
            },
        ];
        prop_assert_eq!(SessionBalance::compute(Decimal::ZERO, &lines).expected(), Decimal::ZERO);
    }
}
