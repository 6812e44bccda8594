//! `SeaORM` Entity for cash_sessions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SessionStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub operator_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub opening_amount: Decimal,
    pub opened_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub expected_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub declared_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub variance: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub closing_notes: Option<String>,
    pub status: SessionStatus,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::operators::Entity",
        from = "Column::OperatorId",
        to = "super::operators::Column::Id"
    )]
    Operators,
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
    #[sea_orm(has_one = "super::cash_counts::Entity")]
    CashCounts,
}

impl Related<super::operators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operators.def()
    }
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl Related<super::cash_counts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashCounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
