//! Close-time reconciliation of expected, declared and counted cash.

use kasa_shared::ReconciliationMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::count::CashCount;
use super::error::ReconciliationError;

/// Direction of the close variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceStatus {
    /// Declared equals expected.
    Balanced,
    /// More cash declared than expected.
    Surplus,
    /// Less cash declared than expected.
    Shortage,
}

impl VarianceStatus {
    /// Classifies a `declared - expected` variance.
    #[must_use]
    pub fn from_variance(variance: Decimal) -> Self {
        if variance.is_zero() {
            Self::Balanced
        } else if variance.is_sign_positive() {
            Self::Surplus
        } else {
            Self::Shortage
        }
    }
}

/// Result of reconciling a session at close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// Ledger-computed expected amount.
    pub expected: Decimal,
    /// Operator-declared amount.
    pub declared: Decimal,
    /// `declared - expected`.
    pub variance: Decimal,
    /// Total of the physical count, when one was taken.
    pub counted: Option<Decimal>,
    /// `counted - declared`, when a count was taken.
    pub count_difference: Option<Decimal>,
    /// Classification of `variance`.
    pub status: VarianceStatus,
}

impl ReconciliationOutcome {
    /// Returns true if a count was taken and disagrees with the declaration.
    #[must_use]
    pub fn has_count_mismatch(&self) -> bool {
        self.count_difference.is_some_and(|d| !d.is_zero())
    }
}

/// Stateless reconciliation engine.
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Cross-checks the ledger expectation, the declaration and the count.
    ///
    /// # Errors
    ///
    /// In [`ReconciliationMode::Strict`], returns `CountMismatch` when the
    /// count total differs from the declared amount. In warn mode the
    /// mismatch is only reported through `count_difference`.
    pub fn reconcile(
        expected: Decimal,
        declared: Decimal,
        count: Option<&CashCount>,
        mode: ReconciliationMode,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let counted = count.map(CashCount::total);
        let count_difference = counted.map(|c| c - declared);

        if mode == ReconciliationMode::Strict {
            if let (Some(counted), Some(diff)) = (counted, count_difference) {
                if !diff.is_zero() {
                    return Err(ReconciliationError::CountMismatch { counted, declared });
                }
            }
        }

        let variance = declared - expected;
        Ok(ReconciliationOutcome {
            expected,
            declared,
            variance,
            counted,
            count_difference,
            status: VarianceStatus::from_variance(variance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::denomination::{Denomination, DenominationTable};
    use rust_decimal_macros::dec;

    fn count_310() -> CashCount {
        CashCount::new(DenominationTable::V1)
            .with(Denomination::Bill200, 1)
            .with(Denomination::Bill50, 2)
            .with(Denomination::Bill10, 1)
    }

    #[test]
    fn test_balanced_without_count() {
        let outcome =
            ReconciliationEngine::reconcile(dec!(130), dec!(130), None, ReconciliationMode::Warn)
                .unwrap();
        assert_eq!(outcome.variance, Decimal::ZERO);
        assert_eq!(outcome.status, VarianceStatus::Balanced);
        assert_eq!(outcome.counted, None);
        assert!(!outcome.has_count_mismatch());
    }

    #[test]
    fn test_surplus_and_shortage() {
        let surplus =
            ReconciliationEngine::reconcile(dec!(100), dec!(105), None, ReconciliationMode::Warn)
                .unwrap();
        assert_eq!(surplus.variance, dec!(5));
        assert_eq!(surplus.status, VarianceStatus::Surplus);

        let shortage =
            ReconciliationEngine::reconcile(dec!(100), dec!(90), None, ReconciliationMode::Warn)
                .unwrap();
        assert_eq!(shortage.variance, dec!(-10));
        assert_eq!(shortage.status, VarianceStatus::Shortage);
    }

    #[test]
    fn test_matching_count_passes_strict() {
        let count = count_310();
        let outcome = ReconciliationEngine::reconcile(
            dec!(300),
            dec!(310),
            Some(&count),
            ReconciliationMode::Strict,
        )
        .unwrap();
        assert_eq!(outcome.counted, Some(dec!(310)));
        assert_eq!(outcome.count_difference, Some(Decimal::ZERO));
        assert_eq!(outcome.status, VarianceStatus::Surplus);
    }

    #[test]
    fn test_mismatch_rejected_in_strict_mode() {
        let count = count_310();
        let result = ReconciliationEngine::reconcile(
            dec!(300),
            dec!(300),
            Some(&count),
            ReconciliationMode::Strict,
        );
        assert_eq!(
            result,
            Err(ReconciliationError::CountMismatch {
                counted: dec!(310),
                declared: dec!(300),
            })
        );
    }

    #[test]
    fn test_mismatch_recorded_in_warn_mode() {
        let count = count_310();
        let outcome = ReconciliationEngine::reconcile(
            dec!(300),
            dec!(300),
            Some(&count),
            ReconciliationMode::Warn,
        )
        .unwrap();
        assert_eq!(outcome.count_difference, Some(dec!(10)));
        assert!(outcome.has_count_mismatch());
        assert_eq!(outcome.status, VarianceStatus::Balanced);
    }
}
