//! Session routes: operator identification, open/close and history.

mod common;

use axum::http::StatusCode;
use common::{TestApp, decimal, insert_operator};
use kasa_shared::ReconciliationMode;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_needs_no_operator() {
    let app = TestApp::new().await;

    let (status, body) = app.send_as(None, "GET", "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_operator_header_is_required_and_checked() {
    let app = TestApp::new().await;

    let (status, body) = app.send_as(None, "GET", "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "MISSING_OPERATOR");

    let (status, body) = app
        .send_as(Some("not-a-uuid".to_string()), "GET", "/api/v1/sessions", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OPERATOR");

    let (status, body) = app
        .send_as(Some(Uuid::new_v4().to_string()), "GET", "/api/v1/sessions", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNKNOWN_OPERATOR");

    let retired = insert_operator(&app.db, "Retired", false).await;
    let (status, body) = app
        .send_as(Some(retired.to_string()), "GET", "/api/v1/sessions", None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "OPERATOR_INACTIVE");
}

#[tokio::test]
async fn test_open_post_close_roundtrip() {
    let app = TestApp::new().await;

    let (status, session) = app
        .send("POST", "/api/v1/sessions", Some(json!({ "opening_amount": "100" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["status"], "open");
    assert_eq!(session["operator_id"], app.operator_id.to_string());

    let (status, _) = app
        .send(
            "POST",
            "/api/v1/movements",
            Some(json!({
                "direction": "inflow",
                "category": "SALE",
                "amount": "50",
                "description": "Ticket 001"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            "/api/v1/movements",
            Some(json!({
                "direction": "outflow",
                "category": "PURCHASE",
                "amount": "20",
                "description": "Bread delivery"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, closed) = app
        .send(
            "POST",
            "/api/v1/sessions/active/close",
            Some(json!({
                "declared_amount": "130",
                "counts": { "100": 1, "20": 1, "10": 1 }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["session"]["status"], "closed");
    assert_eq!(decimal(&closed["outcome"]["reconciliation"]["expected"]), dec!(130));
    assert_eq!(decimal(&closed["outcome"]["reconciliation"]["variance"]), dec!(0));
    assert_eq!(decimal(&closed["count"]["total"]), dec!(130));

    let (status, active) = app.send("GET", "/api/v1/sessions/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(active["session"].is_null());

    let session_id = session["id"].as_str().unwrap();
    let (status, summary) = app
        .send("GET", &format!("/api/v1/sessions/{session_id}/summary"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&summary["expected"]), dec!(130));
}

#[tokio::test]
async fn test_second_open_is_conflict() {
    let app = TestApp::new().await;
    let body = json!({ "opening_amount": "0" });

    let (status, _) = app.send("POST", "/api/v1/sessions", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = app.send("POST", "/api/v1/sessions", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "SESSION_ALREADY_OPEN");
}

#[tokio::test]
async fn test_close_without_session_is_not_found() {
    let app = TestApp::new().await;

    let (status, err) = app
        .send(
            "POST",
            "/api/v1/sessions/active/close",
            Some(json!({ "declared_amount": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "NO_OPEN_SESSION");
}

#[tokio::test]
async fn test_close_rejects_unknown_denomination() {
    let app = TestApp::new().await;
    app.send("POST", "/api/v1/sessions", Some(json!({ "opening_amount": "10" })))
        .await;

    let (status, err) = app
        .send(
            "POST",
            "/api/v1/sessions/active/close",
            Some(json!({ "declared_amount": "10", "counts": { "3": 1 } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "UNKNOWN_DENOMINATION");

    let (_, active) = app.send("GET", "/api/v1/sessions/active", None).await;
    assert_eq!(active["session"]["status"], "open");
}

#[tokio::test]
async fn test_strict_mode_rejects_count_mismatch() {
    let app = TestApp::with_mode(ReconciliationMode::Strict).await;
    app.send("POST", "/api/v1/sessions", Some(json!({ "opening_amount": "50" })))
        .await;

    let (status, err) = app
        .send(
            "POST",
            "/api/v1/sessions/active/close",
            Some(json!({ "declared_amount": "50", "counts": { "20": 2 } })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "COUNT_MISMATCH");
}

#[tokio::test]
async fn test_list_and_get_sessions() {
    let app = TestApp::new().await;
    let (_, first) = app
        .send("POST", "/api/v1/sessions", Some(json!({ "opening_amount": "0" })))
        .await;
    app.send(
        "POST",
        "/api/v1/sessions/active/close",
        Some(json!({ "declared_amount": "0" })),
    )
    .await;
    app.send("POST", "/api/v1/sessions", Some(json!({ "opening_amount": "0" })))
        .await;

    let (status, page) = app
        .send("GET", "/api/v1/sessions?status=closed&per_page=10", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["meta"]["per_page"], 10);
    assert_eq!(page["data"][0]["id"], first["id"]);

    let first_id = first["id"].as_str().unwrap();
    let (status, detail) = app
        .send("GET", &format!("/api/v1/sessions/{first_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["session"]["status"], "closed");

    let (status, _) = app
        .send("GET", &format!("/api/v1/sessions/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
