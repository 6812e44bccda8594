//! `SeaORM` Entity for payment_plans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PlanStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub debtor_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub paid_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub pending_amount: Decimal,
    pub issue_date: Date,
    pub due_date: Date,
    pub status: PlanStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub origin_kind: Option<String>,
    pub origin_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::debtors::Entity",
        from = "Column::DebtorId",
        to = "super::debtors::Column::Id"
    )]
    Debtors,
    #[sea_orm(has_many = "super::installment_payments::Entity")]
    InstallmentPayments,
}

impl Related<super::debtors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debtors.def()
    }
}

impl Related<super::installment_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstallmentPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
