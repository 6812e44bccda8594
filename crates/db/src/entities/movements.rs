//! `SeaORM` Entity for movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MovementDirection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub direction: MovementDirection,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub description: String,
    pub occurred_at: DateTimeUtc,
    pub operator_id: Uuid,
    pub session_id: Option<Uuid>,
    pub source_kind: Option<String>,
    pub source_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub voucher: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_sessions::Entity",
        from = "Column::SessionId",
        to = "super::cash_sessions::Column::Id"
    )]
    CashSessions,
    #[sea_orm(
        belongs_to = "super::operators::Entity",
        from = "Column::OperatorId",
        to = "super::operators::Column::Id"
    )]
    Operators,
}

impl Related<super::cash_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashSessions.def()
    }
}

impl Related<super::operators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
