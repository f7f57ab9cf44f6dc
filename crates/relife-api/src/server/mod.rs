//! HTTP surface for the game orchestrator.
//!
//! Rule rejections (unknown action, not enough time, maxed upgrade, short
//! soul points) ride inside 200 responses as messages; only an unknown run
//! id maps to a transport-level 404 and store failures to 500.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ActionDefinition, ApiError, ErrorCode, MetaState, MonthResolution, RunSnapshot, TurnResult,
    UpgradeDefinition, UpgradePurchaseResult, SCHEMA_VERSION_V1,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::service::GameService;
use crate::store::StoreError;

include!("error.rs");
include!("state.rs");
include!("routes/catalog.rs");
include!("routes/runs.rs");
include!("routes/meta.rs");
include!("util.rs");

pub async fn serve(addr: SocketAddr, service: GameService) -> Result<(), ServerError> {
    let state = AppState::new(service);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/actions", get(list_actions))
        .route("/api/upgrades", get(list_upgrades))
        .route("/api/meta", get(get_meta))
        .route("/api/meta/upgrades", post(purchase_upgrade))
        .route("/api/runs", post(create_run))
        .route("/api/runs/{run_id}", get(get_run))
        .route("/api/runs/{run_id}/actions", post(apply_action))
        .route("/api/runs/{run_id}/next-month", post(next_month))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}
