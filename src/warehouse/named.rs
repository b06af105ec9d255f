//! # Named Query Allow-List
//!
//! The ad-hoc query endpoint does not execute caller-supplied SQL.
//! Callers pick a query by name from this registry and supply only the
//! bound parameter values; anything off the list is a 400. This
//! replaces the raw cross-database passthrough the gateway used to
//! expose.

use sqlx::MySqlPool;

use super::errors::{WarehouseError, WarehouseResult};
use super::row_to_json;

/// One registered query
pub struct NamedQuery {
    pub name: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
    pub params: usize,
}

/// Every query the endpoint may run
pub const NAMED_QUERIES: &[NamedQuery] = &[
    NamedQuery {
        name: "bodega_existencia",
        description: "Stock per product for one warehouse location (bodega, sucursal, empresa)",
        sql: "SELECT cod_item, des_item, CAST(existencia AS DOUBLE) AS existencia \
              FROM v_bodega_existencia \
              WHERE bodega = ? AND sucursal = ? AND empresa = ? \
              ORDER BY cod_item",
        params: 3,
    },
    NamedQuery {
        name: "listas_precio",
        description: "Price list entries for one list/branch pair (lista, sucursal)",
        sql: "SELECT cod_lis, cod_item, CAST(precioiva AS DOUBLE) AS precioiva \
              FROM v_listas_precio \
              WHERE lista = ? AND sucursal = ? \
              ORDER BY cod_item",
        params: 2,
    },
    NamedQuery {
        name: "inventario_resumen",
        description: "Global stock and value totals over the inventory view",
        sql: "SELECT COUNT(DISTINCT COD_ITEM) AS items, \
                     CAST(COALESCE(SUM(EXISTENCIA), 0) AS DOUBLE) AS total_existencia, \
                     CAST(COALESCE(SUM(VALOR), 0) AS DOUBLE) AS total_valor \
              FROM V_INV_BIN007_POWER_BI_TOTAL",
        params: 0,
    },
];

/// Look up a registered query by name
pub fn find(name: &str) -> Option<&'static NamedQuery> {
    NAMED_QUERIES.iter().find(|q| q.name == name)
}

/// Run a registered query with the given parameter values
pub async fn run(
    pool: &MySqlPool,
    name: &str,
    params: &[String],
) -> WarehouseResult<Vec<serde_json::Value>> {
    let named = find(name).ok_or_else(|| WarehouseError::UnknownNamedQuery(name.to_string()))?;

    if params.len() != named.params {
        return Err(WarehouseError::BadParamCount {
            name: named.name.to_string(),
            expected: named.params,
            got: params.len(),
        });
    }

    let mut query = sqlx::query(named.sql);
    for param in params {
        query = query.bind(param);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_json).collect())
}
