//! Status and direction columns, stored as short strings.
//!
//! Each enum converts to and from its `kasa_core` counterpart so repositories
//! never match on raw strings.

use kasa_core::ledger::Direction;
use kasa_core::receivables::PlanStatus as CorePlanStatus;
use kasa_core::session::SessionStatus as CoreSessionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `cash_sessions.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Reconciled.
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl From<SessionStatus> for CoreSessionStatus {
    fn from(value: SessionStatus) -> Self {
        match value {
            SessionStatus::Open => Self::Open,
            SessionStatus::Closed => Self::Closed,
        }
    }
}

impl From<CoreSessionStatus> for SessionStatus {
    fn from(value: CoreSessionStatus) -> Self {
        match value {
            CoreSessionStatus::Open => Self::Open,
            CoreSessionStatus::Closed => Self::Closed,
        }
    }
}

/// `movements.direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Cash received.
    #[sea_orm(string_value = "inflow")]
    Inflow,
    /// Cash paid out.
    #[sea_orm(string_value = "outflow")]
    Outflow,
}

impl From<MovementDirection> for Direction {
    fn from(value: MovementDirection) -> Self {
        match value {
            MovementDirection::Inflow => Self::Inflow,
            MovementDirection::Outflow => Self::Outflow,
        }
    }
}

impl From<Direction> for MovementDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Inflow => Self::Inflow,
            Direction::Outflow => Self::Outflow,
        }
    }
}

/// `payment_plans.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Nothing collected yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partially collected.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully collected.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<PlanStatus> for CorePlanStatus {
    fn from(value: PlanStatus) -> Self {
        match value {
            PlanStatus::Pending => Self::Pending,
            PlanStatus::Partial => Self::Partial,
            PlanStatus::Paid => Self::Paid,
        }
    }
}

impl From<CorePlanStatus> for PlanStatus {
    fn from(value: CorePlanStatus) -> Self {
        match value {
            CorePlanStatus::Pending => Self::Pending,
            CorePlanStatus::Partial => Self::Partial,
            CorePlanStatus::Paid => Self::Paid,
        }
    }
}
