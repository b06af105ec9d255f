//! # Sync HTTP Routes
//!
//! Manual reconciliation trigger plus status and history. History is
//! in-memory and scoped to the current process; the service keeps no
//! sync state of its own across restarts.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::reconcile::ReconcileEngine;
use crate::storefront::StorefrontReader;
use crate::warehouse::WarehouseReader;

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::response::ApiError;
use super::server::AppState;

/// Sync routes under `/api/sync`
pub fn router<W, S>() -> Router<Arc<AppState<W, S>>>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    Router::new()
        .route("/manual", post(manual_handler))
        .route("/status", get(status_handler))
        .route("/history", get(history_handler))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSyncRequest {
    pub product_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

/// Run a reconciliation batch and record it in the history
async fn manual_handler<W, S>(
    user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiJson(request): ApiJson<ManualSyncRequest>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    if request.product_codes.is_empty() {
        return Err(ApiError::bad_request(
            "productCodes must contain at least one code:price:stock tuple",
        ));
    }

    let engine = ReconcileEngine::new(Arc::clone(&state.storefront));
    let report = engine.run(&request.product_codes).await;
    let run = state.sync_log.record("manual", &user.username, &report);

    Ok(Json(json!({
        "success": report.success,
        "run": run,
        "report": report,
    })))
}

/// Live product counts from both stores plus the last recorded run
async fn status_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let (warehouse_count, storefront_count) = tokio::join!(
        state.warehouse.product_count(),
        state.storefront.product_count(),
    );

    Ok(Json(json!({
        "success": true,
        "warehouseProducts": warehouse_count?,
        "storefrontProducts": storefront_count?,
        "lastRun": state.sync_log.last(),
    })))
}

/// Recent reconciliation runs, newest first
async fn history_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let runs = state.sync_log.recent(params.limit.unwrap_or(20));
    Ok(Json(json!({
        "success": true,
        "count": runs.len(),
        "data": runs,
    })))
}
