//! # Extended-Warranty HTTP Routes
//!
//! The warranty sales report joins nine warehouse tables, so the year
//! is mandatory: without it the scan is unbounded. A missing or
//! non-numeric year is rejected with an explanatory 400 before any
//! database work.

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
pub struct WarrantyParams {
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub limit: Option<u32>,
}

/// Paginated extended-warranty sales for one year
pub async fn list_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<WarrantyParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let raw_year = params
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .ok_or_else(|| {
            ApiError::bad_request("The year parameter is required, e.g. ?year=2024")
        })?;
    let year: i32 = raw_year.parse().map_err(|_| {
        ApiError::bad_request(format!("The year parameter must be numeric, got {raw_year:?}"))
    })?;

    let page = PageRequest::clamped(params.page, params.limit, DEFAULT_LIMIT);
    let paged = state.warehouse.warranty_sales(year, &page).await?;

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
