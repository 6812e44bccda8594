//! `SeaORM` Entity for expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub description: String,
    pub expense_date: Date,
    pub payment_method: Option<String>,
    pub voucher: Option<String>,
    pub operator_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_categories::Entity",
        from = "Column::CategoryId",
        to = "super::expense_categories::Column::Id"
    )]
    ExpenseCategories,
}

impl Related<super::expense_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
