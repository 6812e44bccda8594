//! Physical cash count (arqueo) by denomination.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::denomination::{Denomination, DenominationTable};
use super::error::ReconciliationError;

/// Largest per-denomination count a stored arqueo holds (signed 32-bit column).
pub const MAX_PIECES: u32 = 0x7FFF_FFFF;

/// A cash count: one non-negative count per denomination.
///
/// Denominations that were not counted are treated as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CashCount {
    table: DenominationTable,
    counts: BTreeMap<Denomination, u32>,
}

impl CashCount {
    /// Creates an empty count against `table`.
    #[must_use]
    pub fn new(table: DenominationTable) -> Self {
        Self {
            table,
            counts: BTreeMap::new(),
        }
    }

    /// Sets the count of one denomination.
    #[must_use]
    pub fn with(mut self, denomination: Denomination, count: u32) -> Self {
        self.counts.insert(denomination, count);
        self
    }

    /// Builds a count from `(face value label, count)` pairs as received
    /// from a client, e.g. `[("200", 1), ("0.5", 3)]`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDenomination`, `InvalidCount` or
    /// `DuplicateDenomination`.
    pub fn from_face_values<I, K>(table: DenominationTable, pairs: I) -> Result<Self, ReconciliationError>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let mut count = Self::new(table);
        for (label, raw) in pairs {
            let denomination: Denomination = label.as_ref().parse()?;
            if !table.denominations().contains(&denomination) {
                return Err(ReconciliationError::UnknownDenomination(label.as_ref().to_string()));
            }
            let n = u32::try_from(raw)
                .ok()
                .filter(|n| *n <= MAX_PIECES)
                .ok_or_else(|| ReconciliationError::InvalidCount {
                    denomination: denomination.label().to_string(),
                    count: raw,
                })?;
            if count.counts.insert(denomination, n).is_some() {
                return Err(ReconciliationError::DuplicateDenomination(
                    denomination.label().to_string(),
                ));
            }
        }
        Ok(count)
    }

    /// Checks every count fits the stored arqueo.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCount` for the first count above [`MAX_PIECES`].
    pub fn validate(&self) -> Result<(), ReconciliationError> {
        match self.counts.iter().find(|(_, n)| **n > MAX_PIECES) {
            Some((denomination, n)) => Err(ReconciliationError::InvalidCount {
                denomination: denomination.label().to_string(),
                count: i64::from(*n),
            }),
            None => Ok(()),
        }
    }

    /// Denomination table the count was taken against.
    #[must_use]
    pub const fn table(&self) -> DenominationTable {
        self.table
    }

    /// Count of one denomination.
    #[must_use]
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Every denomination of the table with its count, largest first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.table
            .denominations()
            .iter()
            .map(|d| (*d, self.count(*d)))
    }

    /// Total value of the count.
    #[must_use]
    pub fn total(&self) -> Decimal {
        compute_arqueo_total(self)
    }
}

/// Folds a cash count into its total: `sum(count * face value)`.
#[must_use]
pub fn compute_arqueo_total(count: &CashCount) -> Decimal {
    count
        .iter()
        .map(|(denomination, n)| denomination.face_value() * Decimal::from(n))
        .sum()
}
