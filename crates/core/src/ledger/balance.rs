//! Running balance over a session's movements.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{Direction, MovementCategory};

/// The parts of a movement that affect a balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceLine {
    /// Inflow or outflow.
    pub direction: Direction,
    /// Category tag.
    pub category: MovementCategory,
    /// Positive amount.
    pub amount: Decimal,
}

/// Balance of one cash session.
///
/// `expected = opening + inflows - outflows`, where the SESSION_OPEN movement
/// is left out of `inflows` because the opening amount is already counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionBalance {
    /// Opening float.
    pub opening: Decimal,
    /// Sum of inflows, excluding the opening movement.
    pub inflows: Decimal,
    /// Sum of outflows.
    pub outflows: Decimal,
    /// Number of movements folded, the opening movement included.
    pub movement_count: u64,
}

impl SessionBalance {
    /// Folds the movements of a session into its balance.
    #[must_use]
    pub fn compute(opening: Decimal, lines: &[BalanceLine]) -> Self {
        let mut balance = Self {
            opening,
            inflows: Decimal::ZERO,
            outflows: Decimal::ZERO,
            movement_count: 0,
        };
        for line in lines {
            balance.movement_count += 1;
            if line.category == MovementCategory::SessionOpen {
                continue;
            }
            match line.direction {
                Direction::Inflow => balance.inflows += line.amount,
                Direction::Outflow => balance.outflows += line.amount,
            }
        }
        balance
    }

    /// Expected cash in the drawer.
    #[must_use]
    pub fn expected(&self) -> Decimal {
        self.opening + self.inflows - self.outflows
    }
}

/// Total of one category in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category tag.
    pub category: MovementCategory,
    /// Direction of the movements.
    pub direction: Direction,
    /// Sum of amounts.
    pub total: Decimal,
    /// Number of movements.
    pub count: u64,
}

/// Groups movements by category and direction, sorted by tag.
#[must_use]
pub fn summarize_by_category(lines: &[BalanceLine]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<(String, Direction), CategoryTotal> = BTreeMap::new();
    for line in lines {
        let entry = totals
            .entry((line.category.as_tag(), line.direction))
            .or_insert_with(|| CategoryTotal {
                category: line.category.clone(),
                direction: line.direction,
                total: Decimal::ZERO,
                count: 0,
            });
        entry.total += line.amount;
        entry.count += 1;
    }
    totals.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(direction: Direction, category: MovementCategory, amount: Decimal) -> BalanceLine {
        BalanceLine {
            direction,
            category,
            amount,
        }
    }

    #[test]
    fn test_open_close_roundtrip_balance() {
        let lines = vec![
            line(Direction::Inflow, MovementCategory::SessionOpen, dec!(100)),
            line(Direction::Inflow, MovementCategory::Sale, dec!(50)),
            line(Direction::Outflow, MovementCategory::Expense, dec!(20)),
        ];
        let balance = SessionBalance::compute(dec!(100), &lines);
        assert_eq!(balance.inflows, dec!(50));
        assert_eq!(balance.outflows, dec!(20));
        assert_eq!(balance.movement_count, 3);
        assert_eq!(balance.expected(), dec!(130));
    }

    #[test]
    fn test_empty_session_expects_opening() {
        let balance = SessionBalance::compute(dec!(0), &[]);
        assert_eq!(balance.expected(), dec!(0));
        assert_eq!(balance.movement_count, 0);
    }

    #[test]
    fn test_annulment_cancels_original() {
        let lines = vec![
            line(Direction::Outflow, MovementCategory::Expense, dec!(35.50)),
            line(
                Direction::Inflow,
                MovementCategory::Expense.annulled(),
                dec!(35.50),
            ),
        ];
        assert_eq!(SessionBalance::compute(dec!(10), &lines).expected(), dec!(10));
    }

    #[test]
    fn test_summarize_by_category() {
        let lines = vec![
            line(Direction::Inflow, MovementCategory::Sale, dec!(10)),
            line(Direction::Inflow, MovementCategory::Sale, dec!(15)),
            line(Direction::Outflow, MovementCategory::Expense, dec!(7)),
        ];
        let totals = summarize_by_category(&lines);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, MovementCategory::Expense);
        assert_eq!(totals[0].total, dec!(7));
        assert_eq!(totals[1].category, MovementCategory::Sale);
        assert_eq!(totals[1].total, dec!(25));
        assert_eq!(totals[1].count, 2);
    }
}
