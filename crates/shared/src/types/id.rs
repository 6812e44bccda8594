//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `MovementId` where a `CashSessionId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(OperatorId, "Unique identifier for a cashier operating a drawer.");
typed_id!(CashSessionId, "Unique identifier for a cash drawer session.");
typed_id!(MovementId, "Unique identifier for a ledger movement.");
typed_id!(PaymentPlanId, "Unique identifier for a receivable payment plan.");
typed_id!(InstallmentId, "Unique identifier for an installment payment.");
typed_id!(ExpenseId, "Unique identifier for an expense record.");
typed_id!(PayrollPaymentId, "Unique identifier for a payroll payment.");
typed_id!(CashCountId, "Unique identifier for a denomination cash count.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
