//! `SeaORM` Entity for installment_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "installment_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub payment_method: String,
    pub reference: Option<String>,
    pub operator_id: Uuid,
    pub paid_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_plans::Entity",
        from = "Column::PlanId",
        to = "super::payment_plans::Column::Id"
    )]
    PaymentPlans,
}

impl Related<super::payment_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
