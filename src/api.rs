// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! REST API over the points ledger.
//!
//! ## Endpoints
//!
//! All routes live under `/api/v1`.
//!
//! - `GET /customers` - List all customers
//! - `GET /customers/{customer_id}/points` - Get a customer's balance
//! - `POST /customers/{customer_id}/points/add` - Credit points
//! - `POST /customers/{customer_id}/points/redeem` - Redeem points for a reward
//! - `GET /customers/{customer_id}/transactions` - A customer's transaction history
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Request counter
//!
//! ## Example Usage
//!
//! ```bash
//! # Earn
//! curl -X POST http://localhost:8081/api/v1/customers/cust-001/points/add \
//!   -H "Content-Type: application/json" \
//!   -d '{"points": 30, "reason": "bonus"}'
//!
//! # Redeem
//! curl -X POST http://localhost:8081/api/v1/customers/cust-001/points/redeem \
//!   -H "Content-Type: application/json" \
//!   -d '{"points": 50, "reward": "gift card"}'
//!
//! # Balance
//! curl http://localhost:8081/api/v1/customers/cust-001/points
//! ```

use crate::base::{CustomerId, Points};
use crate::customer::Customer;
use crate::ledger::Ledger;
use crate::transaction::Transaction;
use crate::LedgerError;
use axum::{
    Json, Router,
    extract::{Path, Request, State, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Instrument, Level, info, info_span, warn};

/// Response header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "loyalty-points";

// === Request/Response DTOs ===

/// Request body for crediting points.
///
/// ```json
/// {"points": 30, "reason": "bonus"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPointsRequest {
    pub points: Points,
    #[serde(default)]
    pub reason: String,
}

/// Request body for redeeming points.
///
/// ```json
/// {"points": 50, "reward": "gift card"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemPointsRequest {
    pub points: Points,
    #[serde(default)]
    pub reward: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPointsResponse {
    pub message: String,
    pub customer: Customer,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemPointsResponse {
    pub message: String,
    pub reward: String,
    pub customer: Customer,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub total_requests: u64,
    pub status: String,
}

/// Response body for errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Counts every request that reaches the router.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    total_requests: AtomicU64,
}

impl RequestMetrics {
    /// Counts one request and returns its sequence number.
    fn record(&self) -> u64 {
        self.total_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }
}

/// Shared application state containing the ledger.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            metrics: Arc::new(RequestMetrics::default()),
        }
    }
}

// === Error Handling ===

/// Converts ledger errors and body rejections into HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Ledger(LedgerError),
    InvalidBody(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::Ledger(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match self {
            AppError::Ledger(err) => {
                let (status, code) = match &err {
                    LedgerError::InvalidPoints => (StatusCode::BAD_REQUEST, "INVALID_POINTS"),
                    LedgerError::BalanceOverflow => (StatusCode::BAD_REQUEST, "BALANCE_OVERFLOW"),
                    LedgerError::CustomerNotFound => (StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND"),
                    LedgerError::InsufficientPoints => {
                        (StatusCode::BAD_REQUEST, "INSUFFICIENT_POINTS")
                    }
                    LedgerError::DuplicateCustomer => (StatusCode::CONFLICT, "DUPLICATE_CUSTOMER"),
                };
                (status, code, err.to_string())
            }
            AppError::InvalidBody(detail) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST_BODY",
                format!("invalid request body: {detail}"),
            ),
        };

        warn!(status = status.as_u16(), code, error = %error, "request rejected");
        (
            status,
            Json(ErrorResponse {
                error,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// GET /customers/{customer_id}/points - Get a customer's balance.
async fn get_points(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = state.ledger.get_balance(&CustomerId(customer_id))?;
    Ok(Json(customer))
}

/// POST /customers/{customer_id}/points/add - Credit points.
async fn add_points(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: Result<Json<AddPointsRequest>, JsonRejection>,
) -> Result<Json<AddPointsResponse>, AppError> {
    let Json(request) = payload?;
    let (customer, transaction) =
        state
            .ledger
            .credit(&CustomerId(customer_id), request.points, request.reason)?;

    Ok(Json(AddPointsResponse {
        message: "Points added successfully".to_string(),
        customer,
        transaction,
    }))
}

/// POST /customers/{customer_id}/points/redeem - Redeem points.
async fn redeem_points(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: Result<Json<RedeemPointsRequest>, JsonRejection>,
) -> Result<Json<RedeemPointsResponse>, AppError> {
    let Json(request) = payload?;
    let (customer, transaction) = state.ledger.debit(
        &CustomerId(customer_id),
        request.points,
        request.reward.clone(),
    )?;

    Ok(Json(RedeemPointsResponse {
        message: "Points redeemed successfully".to_string(),
        reward: request.reward,
        customer,
        transaction,
    }))
}

/// GET /customers - List all customers.
async fn list_customers(State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(state.ledger.customers())
}

/// GET /customers/{customer_id}/transactions - Transaction history.
async fn list_transactions(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state
        .ledger
        .customer_transactions(&CustomerId(customer_id))?;
    Ok(Json(transactions))
}

/// GET /health - Liveness probe.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics - Request counter.
async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_requests: state.metrics.total_requests(),
        status: "up".to_string(),
    })
}

// === Middleware ===

/// Counts the request, tags it with a request ID and runs it inside a span.
async fn observe(
    State(metrics): State<Arc<RequestMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let sequence = metrics.record();
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let request_id = format!("req-{nanos}-{sequence}");

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        info!("started");
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

// === Router ===

/// Builds the API routes with request observation.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/customers", get(list_customers))
        .route("/customers/{customer_id}/points", get(get_points))
        .route("/customers/{customer_id}/points/add", post(add_points))
        .route("/customers/{customer_id}/points/redeem", post(redeem_points))
        .route(
            "/customers/{customer_id}/transactions",
            get(list_transactions),
        )
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.metrics),
            observe,
        ))
        .with_state(state)
}

/// Builds the served application: the API plus request timeout and
/// response tracing.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO)))
}
