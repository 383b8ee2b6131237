//! E2E Integration Tests for the Trade Lifecycle
//!
//! Drives a trade from creation to delivery through the HTTP API, mixing the
//! REST routes with the generic invoke endpoint.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use trade_lifecycle::{Container, InMemoryLedger, NoOpEventPublisher, create_router};

// =============================================================================
// Helpers
// =============================================================================

fn create_app() -> Router {
    let container = Container::new(Arc::new(InMemoryLedger::new()), Arc::new(NoOpEventPublisher));
    create_router(container.app_state("test"))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn invoke(app: &Router, function: &str, args: &[&str]) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/v1/invoke",
        Some(json!({ "function": function, "args": args })),
    )
    .await
}

async fn create_t1(app: &Router) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/v1/trades",
        Some(json!({
            "trade_id": "T1",
            "buyer_tax_id": "B1",
            "seller_tax_id": "S1",
            "sku_id": "SKU001",
            "trade_price": 10000,
            "shipping_price": 1000
        })),
    )
    .await
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn full_lifecycle_over_rest() {
    let app = create_app();

    let (status, trade) = create_t1(&app).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trade["status"], "Initiated");
    assert_eq!(trade["total_price"], 11000);
    assert!(trade["import_bank_id"].is_null());

    let (status, trade) = send(
        &app,
        "POST",
        "/api/v1/trades/T1/loc",
        Some(json!({ "import_bank_id": "IB1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "LOCCreated");
    assert_eq!(trade["import_bank_id"], "IB1");

    let (status, trade) = send(
        &app,
        "POST",
        "/api/v1/trades/T1/loc/approval",
        Some(json!({ "export_bank_id": "EB1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "LOCApproved");

    let (status, trade) = send(
        &app,
        "POST",
        "/api/v1/trades/T1/shipment",
        Some(json!({ "delivery_date": "2024-06-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "ShipmentInitiated");
    assert_eq!(trade["delivery_date"], "2024-06-01");

    let (status, trade) = send(
        &app,
        "POST",
        "/api/v1/trades/T1/delivery",
        Some(json!({ "shipper_id": "SH1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "BOLCreated");
    assert_eq!(trade["shipper_id"], "SH1");

    let (status, body) = send(&app, "GET", "/api/v1/trades/T1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "BOLCreated");
    assert_eq!(body["terminal"], true);
    assert!(body["next_status"].is_null());

    // Reissuing the letter of credit after delivery is refused.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/trades/T1/loc",
        Some(json!({ "import_bank_id": "IB2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    assert_eq!(body["error"]["context"]["trade_id"], "T1");
    assert_eq!(body["error"]["context"]["current_status"], "BOLCreated");
    assert_eq!(body["error"]["context"]["required_status"], "Initiated");

    let (status, after) = send(&app, "GET", "/api/v1/trades/T1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, trade);
}

#[tokio::test]
async fn full_lifecycle_over_invoke() {
    let app = create_app();

    let (status, trade) = invoke(
        &app,
        "createTrade",
        &["T1", "B1", "S1", "SKU001", "10000", "1000"],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["total_price"], 11000);

    let (status, _) = invoke(&app, "createLOC", &["T1", "IB1"]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = invoke(&app, "approveLOC", &["T1", "EB1"]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = invoke(&app, "initiateShipment", &["T1", "2024-06-01"]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = invoke(&app, "deliverGoods", &["T1", "SH1"]).await;
    assert_eq!(status, StatusCode::OK);

    let (status, trade) = invoke(&app, "query", &["T1"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["trade_id"], "T1");
    assert_eq!(trade["import_bank_id"], "IB1");
    assert_eq!(trade["export_bank_id"], "EB1");
    assert_eq!(trade["delivery_date"], "2024-06-01");
    assert_eq!(trade["shipper_id"], "SH1");
    assert_eq!(trade["status"], "BOLCreated");

    // REST reads see the same ledger.
    let (status, trade) = send(&app, "GET", "/api/v1/trades/T1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "BOLCreated");
}

#[tokio::test]
async fn out_of_order_step_is_rejected_and_leaves_record_unchanged() {
    let app = create_app();
    create_t1(&app).await;

    let (status, body) = invoke(&app, "approveLOC", &["T1", "EB1"]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    assert_eq!(body["error"]["context"]["trade_id"], "T1");
    assert_eq!(body["error"]["context"]["current_status"], "Initiated");
    assert_eq!(body["error"]["context"]["required_status"], "LOCCreated");

    let (_, trade) = invoke(&app, "query", &["T1"]).await;
    assert_eq!(trade["status"], "Initiated");
    assert!(trade["export_bank_id"].is_null());
}

#[tokio::test]
async fn repeated_step_is_rejected() {
    let app = create_app();
    create_t1(&app).await;

    let (status, _) = invoke(&app, "createLOC", &["T1", "IB1"]).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = invoke(&app, "createLOC", &["T1", "IB2"]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let (_, trade) = invoke(&app, "query", &["T1"]).await;
    assert_eq!(trade["import_bank_id"], "IB1");
}

#[tokio::test]
async fn duplicate_create_is_rejected() {
    let app = create_app();

    let (status, _) = create_t1(&app).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_t1(&app).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "TRADE_ALREADY_EXISTS");
}

#[tokio::test]
async fn query_of_unknown_trade_is_not_found() {
    let app = create_app();

    let (status, body) = invoke(&app, "query", &["T404"]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TRADE_NOT_FOUND");

    let (status, _) = send(&app, "GET", "/api/v1/trades/T404/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transition_on_unknown_trade_is_not_found() {
    let app = create_app();

    let (status, body) = invoke(&app, "createLOC", &["T404", "IB1"]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TRADE_NOT_FOUND");
}

#[tokio::test]
async fn query_status_reports_next_step() {
    let app = create_app();
    create_t1(&app).await;

    let (status, body) = invoke(&app, "queryStatus", &["T1"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trade_id"], "T1");
    assert_eq!(body["status"], "Initiated");
    assert_eq!(body["terminal"], false);
    assert_eq!(body["next_status"], "LOCCreated");
}

#[tokio::test]
async fn malformed_invocations_are_bad_requests() {
    let app = create_app();

    let (status, body) = invoke(&app, "createTrade", &["T1", "B1"]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENTS");
    assert_eq!(body["error"]["context"]["function"], "createTrade");

    let (status, body) = invoke(
        &app,
        "createTrade",
        &["T1", "B1", "S1", "SKU001", "ten", "1000"],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENTS");

    let (status, body) = invoke(
        &app,
        "createTrade",
        &["T1", "B1", "S1", "SKU001", "-5", "1000"],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PARAMETERS");

    let (status, body) = invoke(&app, "cancelTrade", &["T1"]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "UNKNOWN_FUNCTION");

    // None of the rejected calls created a record.
    let (status, _) = invoke(&app, "query", &["T1"]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparsable_delivery_date_is_invalid_arguments() {
    let app = create_app();
    create_t1(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/trades/T1/shipment",
        Some(json!({ "delivery_date": "31/10/2017" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENTS");
    assert_eq!(body["error"]["context"]["function"], "initiateShipment");
}

#[tokio::test]
async fn missing_body_field_is_invalid_arguments() {
    let app = create_app();
    create_t1(&app).await;

    let (status, body) = send(&app, "POST", "/api/v1/trades/T1/loc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENTS");
    assert_eq!(body["error"]["context"]["function"], "createLOC");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/trades",
        Some(json!({
            "trade_id": "T2",
            "buyer_tax_id": "B1",
            "seller_tax_id": "S1",
            "sku_id": "SKU001",
            "trade_price": "ten",
            "shipping_price": 1000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENTS");
    assert_eq!(body["error"]["context"]["function"], "createTrade");

    // The rejected calls left T1 as created.
    let (_, trade) = send(&app, "GET", "/api/v1/trades/T1", None).await;
    assert_eq!(trade["status"], "Initiated");
    assert!(trade["import_bank_id"].is_null());
}
