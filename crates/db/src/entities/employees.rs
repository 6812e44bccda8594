//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_payments::Entity")]
    PayrollPayments,
}

impl Related<super::payroll_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
