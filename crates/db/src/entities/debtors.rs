//! `SeaORM` Entity for debtors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "debtors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub document: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment_plans::Entity")]
    PaymentPlans,
}

impl Related<super::payment_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
