//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API. Every trade route resolves to an [`Invocation`] and
//! runs through the shared dispatcher, so REST and generic invoke calls share
//! one commit gate.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::application::dispatch::{Invocation, InvocationDispatcher, InvocationResponse};
use crate::application::dto::CreateTradeDto;
use crate::application::ports::{EventPublisherPort, LedgerStore};
use crate::domain::shared::{BankId, ShipperId, TradeId};
use crate::error::{ApiError, ErrorCode};

use super::request::{
    ApproveLocRequest, CreateLocRequest, DeliverGoodsRequest, InitiateShipmentRequest,
    InvokeRequest,
};
use super::response::HealthResponse;

type ApiResult = Result<(StatusCode, Json<InvocationResponse>), ApiError>;

/// Application state shared across handlers.
pub struct AppState<L, E>
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    /// Dispatcher for all trade operations.
    pub dispatcher: Arc<InvocationDispatcher<L, E>>,
    /// Application version.
    pub version: String,
}

impl<L, E> Clone for AppState<L, E>
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<L, E>(state: AppState<L, E>) -> Router
where
    L: LedgerStore + 'static,
    E: EventPublisherPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/invoke", post(invoke))
        .route("/api/v1/trades", post(create_trade))
        .route("/api/v1/trades/{trade_id}", get(get_trade))
        .route("/api/v1/trades/{trade_id}/status", get(get_trade_status))
        .route("/api/v1/trades/{trade_id}/loc", post(create_loc))
        .route("/api/v1/trades/{trade_id}/loc/approval", post(approve_loc))
        .route("/api/v1/trades/{trade_id}/shipment", post(initiate_shipment))
        .route("/api/v1/trades/{trade_id}/delivery", post(deliver_goods))
        .with_state(state)
}

async fn run<L, E>(state: &AppState<L, E>, invocation: Invocation, success: StatusCode) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let response = state.dispatcher.execute(invocation).await?;
    Ok((success, Json(response)))
}

/// Unwrap a JSON body, reporting a rejection as `INVALID_ARGUMENTS`.
fn parse_body<T>(function: &str, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(function, error = %rejection.body_text(), "Rejected request body");
            Err(
                ApiError::new(ErrorCode::InvalidArguments, rejection.body_text())
                    .with_context("function", function),
            )
        }
    }
}

/// Health check endpoint.
async fn health_check<L, E>(State(state): State<AppState<L, E>>) -> impl IntoResponse
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Generic invoke endpoint.
async fn invoke<L, E>(
    State(state): State<AppState<L, E>>,
    payload: Result<Json<InvokeRequest>, JsonRejection>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let request = parse_body("invoke", payload)?;
    let response = state
        .dispatcher
        .invoke(&request.function, &request.args)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Create trade endpoint.
async fn create_trade<L, E>(
    State(state): State<AppState<L, E>>,
    payload: Result<Json<CreateTradeDto>, JsonRejection>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let request = parse_body("createTrade", payload)?;
    run(
        &state,
        Invocation::CreateTrade(request.into_command()),
        StatusCode::CREATED,
    )
    .await
}

/// Get trade endpoint.
async fn get_trade<L, E>(
    State(state): State<AppState<L, E>>,
    Path(trade_id): Path<String>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let trade_id = TradeId::new(trade_id);
    run(&state, Invocation::Query { trade_id }, StatusCode::OK).await
}

/// Get trade status endpoint.
async fn get_trade_status<L, E>(
    State(state): State<AppState<L, E>>,
    Path(trade_id): Path<String>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let trade_id = TradeId::new(trade_id);
    run(&state, Invocation::QueryStatus { trade_id }, StatusCode::OK).await
}

/// Create letter of credit endpoint.
async fn create_loc<L, E>(
    State(state): State<AppState<L, E>>,
    Path(trade_id): Path<String>,
    payload: Result<Json<CreateLocRequest>, JsonRejection>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let request = parse_body("createLOC", payload)?;
    let invocation = Invocation::CreateLoc {
        trade_id: TradeId::new(trade_id),
        import_bank_id: BankId::new(request.import_bank_id),
    };
    run(&state, invocation, StatusCode::OK).await
}

/// Approve letter of credit endpoint.
async fn approve_loc<L, E>(
    State(state): State<AppState<L, E>>,
    Path(trade_id): Path<String>,
    payload: Result<Json<ApproveLocRequest>, JsonRejection>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let request = parse_body("approveLOC", payload)?;
    let invocation = Invocation::ApproveLoc {
        trade_id: TradeId::new(trade_id),
        export_bank_id: BankId::new(request.export_bank_id),
    };
    run(&state, invocation, StatusCode::OK).await
}

/// Initiate shipment endpoint.
async fn initiate_shipment<L, E>(
    State(state): State<AppState<L, E>>,
    Path(trade_id): Path<String>,
    payload: Result<Json<InitiateShipmentRequest>, JsonRejection>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let request = parse_body("initiateShipment", payload)?;
    let invocation = Invocation::InitiateShipment {
        trade_id: TradeId::new(trade_id),
        delivery_date: request.delivery_date,
    };
    run(&state, invocation, StatusCode::OK).await
}

/// Deliver goods endpoint.
async fn deliver_goods<L, E>(
    State(state): State<AppState<L, E>>,
    Path(trade_id): Path<String>,
    payload: Result<Json<DeliverGoodsRequest>, JsonRejection>,
) -> ApiResult
where
    L: LedgerStore,
    E: EventPublisherPort,
{
    let request = parse_body("deliverGoods", payload)?;
    let invocation = Invocation::DeliverGoods {
        trade_id: TradeId::new(trade_id),
        shipper_id: ShipperId::new(request.shipper_id),
    };
    run(&state, invocation, StatusCode::OK).await
}
