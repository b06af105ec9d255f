//! # Product Sync HTTP Routes
//!
//! Warehouse product views used by the storefront synchronizer: stock
//! by location, the raw price lists, the joined stock+price view with
//! its compact export string, the cross-catalog comparison and the
//! allow-listed custom query endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::reconcile::{ReconcileEngine, SyncReport, SyncTuple};
use crate::storefront::StorefrontReader;
use crate::warehouse::WarehouseReader;

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::response::ApiError;
use super::server::AppState;

/// Price list holding the previous (pre-discount) prices
const PRIOR_PRICE_LIST: &str = "22";
/// Price list holding the current selling prices
const CURRENT_PRICE_LIST: &str = "05";

/// Product routes under `/api/productos`
pub fn router<W, S>() -> Router<Arc<AppState<W, S>>>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    Router::new()
        .route("/novasoft", get(novasoft_handler))
        .route("/precios", get(prices_handler))
        .route("/con-precios", get(with_prices_handler))
        .route("/compare", post(compare_handler))
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub bodega: Option<String>,
    pub sucursal: Option<String>,
    pub empresa: Option<String>,
}

impl LocationParams {
    fn bodega(&self) -> &str {
        self.bodega.as_deref().unwrap_or("080")
    }

    fn sucursal(&self) -> &str {
        self.sucursal.as_deref().unwrap_or("cuc")
    }

    fn empresa(&self) -> &str {
        self.empresa.as_deref().unwrap_or("cbb sas")
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceListParams {
    pub lista: Option<String>,
    pub sucursal: Option<String>,
}

/// Joined stock+price row; quantities and prices are rounded to whole
/// units, matching what the storefront updater stores.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    pub cod_item: String,
    pub des_item: String,
    pub existencia: i64,
    pub precio_anterior: i64,
    pub precio_actual: i64,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    /// Comma-separated `code:price:stock[:prior]` tuples
    pub cods: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomQueryRequest {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
}

// ==================
// Handlers
// ==================

/// Warehouse stock for one bodega/sucursal/empresa
async fn novasoft_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiQuery(params): ApiQuery<LocationParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let products = state
        .warehouse
        .stock_by_location(params.bodega(), params.sucursal(), params.empresa())
        .await?;

    Ok(Json(json!({
        "success": true,
        "count": products.len(),
        "data": products,
    })))
}

/// One raw price list
async fn prices_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiQuery(params): ApiQuery<PriceListParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let lista = params.lista.as_deref().unwrap_or(CURRENT_PRICE_LIST);
    let sucursal = params.sucursal.as_deref().unwrap_or("cuc");
    let prices = state.warehouse.price_list(lista, sucursal).await?;

    Ok(Json(json!({
        "success": true,
        "count": prices.len(),
        "lista": lista,
        "data": prices,
    })))
}

/// Stock joined with the previous and current price lists, plus the
/// compact export string consumed by the storefront updater.
///
/// Items whose rounded stock is negative, or with a `/` in the code
/// (kit components), are excluded; an item missing from the current
/// price list is excluded too, while a missing previous price defaults
/// to zero.
async fn with_prices_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiQuery(params): ApiQuery<LocationParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let sucursal = params.sucursal().to_string();

    let (products, prior_prices, current_prices) = tokio::try_join!(
        state
            .warehouse
            .stock_by_location(params.bodega(), &sucursal, params.empresa()),
        state.warehouse.price_list(PRIOR_PRICE_LIST, &sucursal),
        state.warehouse.price_list(CURRENT_PRICE_LIST, &sucursal),
    )?;

    let prior: std::collections::HashMap<&str, f64> = prior_prices
        .iter()
        .map(|p| (p.cod_item.as_str(), p.precioiva))
        .collect();
    let current: std::collections::HashMap<&str, f64> = current_prices
        .iter()
        .map(|p| (p.cod_item.as_str(), p.precioiva))
        .collect();

    let mut items = Vec::new();
    let mut export = Vec::new();
    for product in &products {
        let existencia = product.existencia.round() as i64;
        if existencia < 0 || product.cod_item.contains('/') {
            continue;
        }
        let Some(&precio_actual) = current.get(product.cod_item.as_str()) else {
            continue;
        };
        let precio_anterior = prior.get(product.cod_item.as_str()).copied().unwrap_or(0.0);

        export.push(
            SyncTuple {
                code: product.cod_item.clone(),
                price_now: precio_actual,
                price_before: precio_anterior,
                stock: existencia,
            }
            .export(),
        );
        items.push(PricedProduct {
            cod_item: product.cod_item.clone(),
            des_item: product.des_item.clone(),
            existencia,
            precio_anterior: precio_anterior.round() as i64,
            precio_actual: precio_actual.round() as i64,
        });
    }

    Ok(Json(json!({
        "success": true,
        "count": items.len(),
        "data": items,
        "todos_los_cod": export.join(","),
    })))
}

/// Full cross-catalog comparison for a tuple batch
async fn compare_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiJson(request): ApiJson<CompareRequest>,
) -> Result<Json<SyncReport>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let tuples: Vec<String> = request
        .cods
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tuples.is_empty() {
        return Err(ApiError::bad_request(
            "The cods field must contain at least one code:price:stock tuple",
        ));
    }

    let engine = ReconcileEngine::new(Arc::clone(&state.storefront));
    Ok(Json(engine.run(&tuples).await))
}

/// Run one of the predefined warehouse queries with bound parameters.
/// The name must be on the allow-list; raw SQL is never accepted.
pub async fn custom_query_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiJson(request): ApiJson<CustomQueryRequest>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let rows = state
        .warehouse
        .named_query(&request.name, &request.params)
        .await?;

    Ok(Json(json!({
        "success": true,
        "name": request.name,
        "count": rows.len(),
        "data": rows,
    })))
}
