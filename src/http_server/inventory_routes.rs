//! # Inventory HTTP Routes
//!
//! Paginated inventory listing with allow-listed filters plus the
//! by-brand aggregate. Both endpoints share the same filter set so the
//! aggregate always describes the same slice the listing pages over.

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::query::{lenient_u32, PageLinks, PageRequest, Paginated, DEFAULT_LIMIT};
use crate::storefront::StorefrontReader;
use crate::warehouse::{InventoryQuery, WarehouseReader};

use super::extract::{ApiQuery, AuthUser};
use super::response::ApiError;
use super::server::AppState;

/// Inventory routes under `/api/inventario`
pub fn router<W, S>() -> Router<Arc<AppState<W, S>>>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    Router::new()
        .route("/", get(list_handler))
        .route("/marcas", get(brands_handler))
}

#[derive(Debug, Deserialize)]
pub struct InventoryParams {
    pub ciudad: Option<String>,
    pub empresa: Option<String>,
    pub nom_gru: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub limit: Option<u32>,
}

impl InventoryParams {
    fn query(&self) -> InventoryQuery {
        InventoryQuery {
            ciudad: self.ciudad.clone(),
            empresa: self.empresa.clone(),
            nom_gru: self.nom_gru.clone(),
        }
    }

    fn echo(&self) -> Value {
        json!({
            "ciudad": self.ciudad,
            "empresa": self.empresa,
            "nom_gru": self.nom_gru,
        })
    }
}

/// Paginated inventory with summary over the same filtered set
async fn list_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<InventoryParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let page = PageRequest::clamped(params.page, params.limit, DEFAULT_LIMIT);
    let (paged, summary) = state.warehouse.inventory(&params.query(), &page).await?;

    let links = PageLinks::build(
        state.config.public_url.as_deref(),
        uri.path(),
        uri.query(),
        &page,
        paged.total,
    );

    let envelope = Paginated::new(&page, paged.total, links, paged.rows)
        .with_summary(serde_json::to_value(summary)?);
    let mut body = serde_json::to_value(envelope)?;
    body["filters"] = params.echo();
    Ok(Json(body))
}

/// Inventory grouped by brand under the same optional filters
async fn brands_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    ApiQuery(params): ApiQuery<InventoryParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let brands = state.warehouse.inventory_by_brand(&params.query()).await?;
    Ok(Json(json!({
        "success": true,
        "count": brands.len(),
        "filters": params.echo(),
        "data": brands,
    })))
}
