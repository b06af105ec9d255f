//! # Catalog HTTP Routes
//!
//! The motorcycle catalog listing: items with current-year stock and a
//! price on the retail lists, with VAT amount and final price computed
//! server-side.

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::query::{lenient_u32, PageLinks, PageRequest, Paginated, DEFAULT_LIMIT};
use crate::storefront::StorefrontReader;
use crate::warehouse::WarehouseReader;

use super::extract::{ApiQuery, AuthUser};
use super::response::ApiError;
use super::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub limit: Option<u32>,
}

/// Paginated catalog with computed VAT and final price
pub async fn list_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<CatalogParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let page = PageRequest::clamped(params.page, params.limit, DEFAULT_LIMIT);
    let paged = state.warehouse.catalog(&page).await?;

    let links = PageLinks::build(
        state.config.public_url.as_deref(),
        uri.path(),
        uri.query(),
        &page,
        paged.total,
    );

    let envelope = Paginated::new(&page, paged.total, links, paged.rows);
    Ok(Json(serde_json::to_value(envelope)?))
}
