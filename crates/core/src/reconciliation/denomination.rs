//! Fixed, versioned table of bills and coins.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReconciliationError;

/// A bill or coin of the ledger currency, ordered largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Denomination {
    /// 200 bill.
    #[serde(rename = "200")]
    Bill200,
    /// 100 bill.
    #[serde(rename = "100")]
    Bill100,
    /// 50 bill.
    #[serde(rename = "50")]
    Bill50,
    /// 20 bill.
    #[serde(rename = "20")]
    Bill20,
    /// 10 bill.
    #[serde(rename = "10")]
    Bill10,
    /// 5 coin.
    #[serde(rename = "5")]
    Coin5,
    /// 2 coin.
    #[serde(rename = "2")]
    Coin2,
    /// 1 coin.
    #[serde(rename = "1")]
    Coin1,
    /// 0.50 coin.
    #[serde(rename = "0.50")]
    Coin050,
    /// 0.20 coin.
    #[serde(rename = "0.20")]
    Coin020,
    /// 0.10 coin.
    #[serde(rename = "0.10")]
    Coin010,
}

impl Denomination {
    /// Face value of the bill or coin.
    #[must_use]
    pub fn face_value(self) -> Decimal {
        match self {
            Self::Bill200 => Decimal::new(200, 0),
            Self::Bill100 => Decimal::new(100, 0),
            Self::Bill50 => Decimal::new(50, 0),
            Self::Bill20 => Decimal::new(20, 0),
            Self::Bill10 => Decimal::new(10, 0),
            Self::Coin5 => Decimal::new(5, 0),
            Self::Coin2 => Decimal::new(2, 0),
            Self::Coin1 => Decimal::new(1, 0),
            Self::Coin050 => Decimal::new(50, 2),
            Self::Coin020 => Decimal::new(20, 2),
            Self::Coin010 => Decimal::new(10, 2),
        }
    }

    /// Label used on the wire and in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bill200 => "200",
            Self::Bill100 => "100",
            Self::Bill50 => "50",
            Self::Bill20 => "20",
            Self::Bill10 => "10",
            Self::Coin5 => "5",
            Self::Coin2 => "2",
            Self::Coin1 => "1",
            Self::Coin050 => "0.50",
            Self::Coin020 => "0.20",
            Self::Coin010 => "0.10",
        }
    }

    /// Looks up the denomination with the given face value.
    ///
    /// Trailing zeros are ignored, so `0.5` and `0.50` both match.
    #[must_use]
    pub fn from_face_value(value: Decimal) -> Option<Self> {
        let value = value.normalize();
        DenominationTable::V1
            .denominations()
            .iter()
            .copied()
            .find(|d| d.face_value().normalize() == value)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Denomination {
    type Err = ReconciliationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .ok()
            .and_then(Self::from_face_value)
            .ok_or_else(|| ReconciliationError::UnknownDenomination(s.to_string()))
    }
}

/// Version of the denomination table a count was taken against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenominationTable {
    /// 200/100/50/20/10 bills and 5/2/1/0.50/0.20/0.10 coins.
    #[default]
    V1,
}

const V1_DENOMINATIONS: [Denomination; 11] = [
    Denomination::Bill200,
    Denomination::Bill100,
    Denomination::Bill50,
    Denomination::Bill20,
    Denomination::Bill10,
    Denomination::Coin5,
    Denomination::Coin2,
    Denomination::Coin1,
    Denomination::Coin050,
    Denomination::Coin020,
    Denomination::Coin010,
];

impl DenominationTable {
    /// Stored version tag.
    #[must_use]
    pub const fn version(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }

    /// Denominations of this table, largest first.
    #[must_use]
    pub const fn denominations(self) -> &'static [Denomination] {
        match self {
            Self::V1 => &V1_DENOMINATIONS,
        }
    }
}
