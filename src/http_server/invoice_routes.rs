//! # Invoicing HTTP Routes
//!
//! Paginated invoice listing. Every query is bounded to `FACTURA`
//! documents of a single year: the configured fixed year when set, the
//! current year otherwise. The six-sum summary covers the same filtered
//! set as the page.

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::query::{lenient_u32, PageLinks, PageRequest, Paginated, DEFAULT_LIMIT};
use crate::storefront::StorefrontReader;
use crate::warehouse::{InvoiceQuery, WarehouseReader};

use super::extract::{ApiQuery, AuthUser};
use super::response::ApiError;
use super::server::AppState;

#[derive(Debug, Deserialize)]
pub struct InvoiceParams {
    pub tienda: Option<String>,
    pub ano_doc: Option<String>,
    pub cod_mar: Option<String>,
    pub cod_grupo: Option<String>,
    pub cod_subgrupo: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub limit: Option<u32>,
}

/// Paginated invoices with the six-sum summary
pub async fn list_handler<W, S>(
    _user: AuthUser,
    State(state): State<Arc<AppState<W, S>>>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<InvoiceParams>,
) -> Result<Json<Value>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let year = state
        .config
        .invoice_year
        .unwrap_or_else(|| Utc::now().year());

    let query = InvoiceQuery {
        tienda: params.tienda.clone(),
        ano_doc: params.ano_doc.clone(),
        cod_mar: params.cod_mar.clone(),
        cod_grupo: params.cod_grupo.clone(),
        cod_subgrupo: params.cod_subgrupo.clone(),
        year,
    };

    let page = PageRequest::clamped(params.page, params.limit, DEFAULT_LIMIT);
    let (paged, summary) = state.warehouse.invoices(&query, &page).await?;

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
    body["filters"] = json!({
        "tienda": params.tienda,
        "ano_doc": params.ano_doc,
        "cod_mar": params.cod_mar,
        "cod_grupo": params.cod_grupo,
        "cod_subgrupo": params.cod_subgrupo,
        "year": year,
    });
    Ok(Json(body))
}
