//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with the real
//! migrations applied. The pool holds a single connection: the database
//! lives and dies with it.

#![allow(dead_code)]
#![allow(clippy::missing_panics_doc)]

use chrono::{NaiveDate, Utc};
use kasa_core::ledger::{Direction, MovementCategory, PostMovementInput};
use kasa_core::session::{CloseSessionInput, OpenSessionInput};
use kasa_db::entities::{debtors, employees, expense_categories, operators};
use kasa_db::migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection,
};
use uuid::Uuid;

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn insert_operator(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    operators::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert operator");
    id
}

pub async fn insert_debtor(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    debtors::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        document: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert debtor");
    id
}

pub async fn insert_employee(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    employees::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert employee");
    id
}

pub async fn insert_category(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    expense_categories::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert expense category");
    id
}

pub fn open_input(operator_id: Uuid, opening: Decimal) -> OpenSessionInput {
    OpenSessionInput {
        operator_id,
        opening_amount: opening,
        notes: None,
    }
}

pub fn close_input(operator_id: Uuid, declared: Decimal) -> CloseSessionInput {
    CloseSessionInput {
        operator_id,
        declared_amount: declared,
        notes: None,
        count: None,
    }
}

pub fn movement(
    operator_id: Uuid,
    direction: Direction,
    category: MovementCategory,
    amount: Decimal,
) -> PostMovementInput {
    PostMovementInput {
        direction,
        category,
        amount,
        description: format!("{direction} test movement"),
        operator_id,
        session_id: None,
        source: None,
        payment_method: Some("cash".to_string()),
        voucher: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
