//! Ledger Failure Integration Tests
//!
//! Ledger outages, corrupted records and file-backed durability, observed
//! through the HTTP API and the engine.

// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;

use trade_lifecycle::infrastructure::config::demo_trade_command;
use trade_lifecycle::{
    BankId, Container, FileLedger, InMemoryLedger, LedgerError, LedgerStore, NoOpEventPublisher,
    ShipperId, TradeError, TradeId, TradeLifecycleEngine, TradeStatus, create_router,
};

// =============================================================================
// Test doubles
// =============================================================================

/// Ledger that wraps an in-memory store and can be switched offline.
#[derive(Default)]
struct FlakyLedger {
    inner: InMemoryLedger,
    reads_offline: AtomicBool,
    writes_offline: AtomicBool,
}

#[async_trait]
impl LedgerStore for FlakyLedger {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if self.reads_offline.load(Ordering::SeqCst) {
            return Err(LedgerError::ReadFailed {
                key: key.to_string(),
                message: "peer unreachable".to_string(),
            });
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if self.writes_offline.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteFailed {
                key: key.to_string(),
                message: "endorsement timeout".to_string(),
            });
        }
        self.inner.put(key, value).await
    }
}

async fn send(app: &Router, function: &str, args: &[&str]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/invoke")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "function": function, "args": args }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Ledger outages
// =============================================================================

#[tokio::test]
async fn write_outage_is_service_unavailable_and_changes_nothing() {
    let ledger = Arc::new(FlakyLedger::default());
    let container = Container::new(Arc::clone(&ledger), Arc::new(NoOpEventPublisher));
    let app = create_router(container.app_state("test"));

    let (status, _) = send(
        &app,
        "createTrade",
        &["T1", "B1", "S1", "SKU001", "10000", "1000"],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    ledger.writes_offline.store(true, Ordering::SeqCst);
    let (status, body) = send(&app, "createLOC", &["T1", "IB1"]).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");

    ledger.writes_offline.store(false, Ordering::SeqCst);
    let (status, trade) = send(&app, "query", &["T1"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "Initiated");
    assert!(trade["import_bank_id"].is_null());

    // The step can be retried once the ledger is back.
    let (status, trade) = send(&app, "createLOC", &["T1", "IB1"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["status"], "LOCCreated");
}

#[tokio::test]
async fn read_outage_is_service_unavailable() {
    let ledger = Arc::new(FlakyLedger::default());
    ledger.reads_offline.store(true, Ordering::SeqCst);
    let container = Container::new(Arc::clone(&ledger), Arc::new(NoOpEventPublisher));
    let app = create_router(container.app_state("test"));

    let (status, body) = send(&app, "queryStatus", &["T1"]).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");

    let (status, _) = send(
        &app,
        "createTrade",
        &["T1", "B1", "S1", "SKU001", "10000", "1000"],
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(ledger.inner.is_empty());
}

// =============================================================================
// Corrupted records
// =============================================================================

#[tokio::test]
async fn malformed_record_is_reported_and_never_overwritten() {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.insert_raw("T1", b"{not a trade".to_vec());
    let container = Container::new(Arc::clone(&ledger), Arc::new(NoOpEventPublisher));
    let app = create_router(container.app_state("test"));

    let (status, body) = send(&app, "query", &["T1"]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "MALFORMED_RECORD");
    assert_eq!(body["error"]["context"]["trade_id"], "T1");

    let (status, body) = send(&app, "createLOC", &["T1", "IB1"]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "MALFORMED_RECORD");

    // A key holding garbage still counts as taken.
    let (status, body) = send(
        &app,
        "createTrade",
        &["T1", "B1", "S1", "SKU001", "10000", "1000"],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "TRADE_ALREADY_EXISTS");

    assert_eq!(
        ledger.get("T1").await.unwrap(),
        Some(b"{not a trade".to_vec())
    );
}

#[tokio::test]
async fn record_stored_under_wrong_key_is_malformed() {
    let ledger = Arc::new(InMemoryLedger::new());
    let engine = TradeLifecycleEngine::new(Arc::clone(&ledger), Arc::new(NoOpEventPublisher));
    engine.create_trade(demo_trade_command()).await.unwrap();

    let blob = ledger.get("FTE_1").await.unwrap().unwrap();
    ledger.insert_raw("FTE_2", blob);

    let err = engine.query(&TradeId::new("FTE_2")).await.unwrap_err();
    assert!(matches!(err, TradeError::MalformedRecord { .. }));
}

// =============================================================================
// File-backed ledger
// =============================================================================

#[tokio::test]
async fn file_ledger_keeps_trades_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.bin");
    let trade_id = TradeId::new("FTE_1");

    {
        let ledger = Arc::new(FileLedger::open(&path).await.unwrap());
        let engine = TradeLifecycleEngine::new(ledger, Arc::new(NoOpEventPublisher));
        engine.create_trade(demo_trade_command()).await.unwrap();
        engine
            .create_loc(&trade_id, BankId::new("IB1"))
            .await
            .unwrap();
        engine
            .approve_loc(&trade_id, BankId::new("EB1"))
            .await
            .unwrap();
    }

    let ledger = Arc::new(FileLedger::open(&path).await.unwrap());
    assert_eq!(ledger.len().await, 1);
    let engine = TradeLifecycleEngine::new(ledger, Arc::new(NoOpEventPublisher));
    assert_eq!(
        engine.query_status(&trade_id).await.unwrap(),
        TradeStatus::LocApproved
    );

    let delivery_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    engine
        .initiate_shipment(&trade_id, delivery_date)
        .await
        .unwrap();
    let trade = engine
        .deliver_goods(&trade_id, ShipperId::new("SH1"))
        .await
        .unwrap();

    assert_eq!(trade.status(), TradeStatus::BolCreated);
    assert_eq!(trade.delivery_date(), Some(delivery_date));
    assert_eq!(trade.export_bank_id().map(|b| b.as_str()), Some("EB1"));
}

#[tokio::test]
async fn corrupted_ledger_file_refuses_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.bin");
    std::fs::write(&path, [0xFF, 0xFF, 0xFF, 0xFF, 0x01]).unwrap();

    let err = FileLedger::open(&path).await.unwrap_err();
    assert!(matches!(err, LedgerError::Corrupted { .. }));
}
