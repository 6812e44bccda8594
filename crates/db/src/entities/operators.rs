//! `SeaORM` Entity for operators table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operators")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_sessions::Entity")]
    CashSessions,
}

impl Related<super::cash_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
