//! `SeaORM` Entity for cash_counts table (arqueos).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_counts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub session_id: Uuid,
    pub denomination_table: String,
    pub bills_200: i32,
    pub bills_100: i32,
    pub bills_50: i32,
    pub bills_20: i32,
    pub bills_10: i32,
    pub coins_5: i32,
    pub coins_2: i32,
    pub coins_1: i32,
    pub coins_0_50: i32,
    pub coins_0_20: i32,
    pub coins_0_10: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub declared_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub count_difference: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_sessions::Entity",
        from = "Column::SessionId",
        to = "super::cash_sessions::Column::Id"
    )]
    CashSessions,
}

impl Related<super::cash_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
