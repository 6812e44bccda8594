//! Router fixtures: a fresh in-memory database behind the full router.

#![allow(dead_code)]
#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::Utc;
use http_body_util::BodyExt;
use kasa_api::{AppState, create_router, middleware::OPERATOR_HEADER};
use kasa_db::entities::{debtors, employees, expense_categories, operators};
use kasa_db::migration::{Migrator, MigratorTrait};
use kasa_shared::{LedgerConfig, ReconciliationMode};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub operator_id: Uuid,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_mode(ReconciliationMode::Warn).await
    }

    pub async fn with_mode(mode: ReconciliationMode) -> Self {
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

        let operator_id = insert_operator(&db, "Ana", true).await;
        let state = AppState {
            db: Arc::new(db.clone()),
            reconciliation_mode: mode,
            ledger: Arc::new(LedgerConfig::default()),
        };

        Self {
            router: create_router(state),
            db,
            operator_id,
        }
    }

    /// Sends a request as the default operator.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_as(Some(self.operator_id.to_string()), method, uri, body)
            .await
    }

    /// Sends a request with an arbitrary operator header (or none).
    pub async fn send_as(
        &self,
        operator: Option<String>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(operator) = operator {
            builder = builder.header(OPERATOR_HEADER, operator);
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };
        (status, json)
    }
}

pub async fn insert_operator(db: &DatabaseConnection, name: &str, active: bool) -> Uuid {
    let id = Uuid::new_v4();
    operators::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        active: Set(active),
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

/// Reads a decimal rendered as a JSON string.
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"))
        .parse()
        .expect("Invalid decimal")
}
