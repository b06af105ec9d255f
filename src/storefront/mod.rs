//! # Storefront Access
//!
//! Read-only access to the WordPress/WooCommerce database. Product
//! attributes live in the `wp_postmeta` key/value table, so a lookup
//! pivots the relevant meta keys into one row per product. Products are
//! matched by SKU or by the alternate warehouse-code meta field.

use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

pub mod errors;

pub use errors::{StorefrontError, StorefrontResult};

/// Price and stock state of one storefront product
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontProduct {
    pub code: String,
    /// `_regular_price` meta (the pre-sale price)
    pub regular_price: Option<f64>,
    /// `_price` meta (the effective selling price)
    pub current_price: Option<f64>,
    /// `_stock` meta
    pub stock: Option<i64>,
}

/// Read-side contract against the storefront database
#[async_trait]
pub trait StorefrontReader: Send + Sync + 'static {
    /// Look up one product by warehouse code; `None` when the code has
    /// no matching storefront record
    async fn lookup(&self, code: &str) -> StorefrontResult<Option<StorefrontProduct>>;

    /// Total published products, used by the sync status report
    async fn product_count(&self) -> StorefrontResult<i64>;
}

#[derive(Debug, FromRow)]
struct MetaRow {
    regular_price: Option<String>,
    current_price: Option<String>,
    stock: Option<String>,
}

/// Storefront reader backed by a process-lifetime MySQL pool
#[derive(Clone)]
pub struct MySqlStorefront {
    pool: MySqlPool,
}

impl MySqlStorefront {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorefrontReader for MySqlStorefront {
    async fn lookup(&self, code: &str) -> StorefrontResult<Option<StorefrontProduct>> {
        // Pivot the meta key/value rows of the matching product into one row.
        // Meta values are stored as text and parsed on this side.
        let row = sqlx::query_as::<_, MetaRow>(
            "SELECT \
                MAX(CASE WHEN meta.meta_key = '_regular_price' THEN meta.meta_value END) AS regular_price, \
                MAX(CASE WHEN meta.meta_key = '_price' THEN meta.meta_value END) AS current_price, \
                MAX(CASE WHEN meta.meta_key = '_stock' THEN meta.meta_value END) AS stock \
             FROM wp_postmeta sku \
             INNER JOIN wp_postmeta meta ON meta.post_id = sku.post_id \
             WHERE sku.meta_key IN ('_sku', '_cod_novasoft') AND sku.meta_value = ? \
             GROUP BY sku.post_id \
             LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|meta| StorefrontProduct {
            code: code.to_string(),
            regular_price: parse_meta_number(meta.regular_price.as_deref()),
            current_price: parse_meta_number(meta.current_price.as_deref()),
            stock: parse_meta_number(meta.stock.as_deref()).map(|v| v.round() as i64),
        }))
    }

    async fn product_count(&self) -> StorefrontResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM wp_posts WHERE post_type = 'product' AND post_status = 'publish'",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}

/// Meta values are free text; anything unparseable counts as absent
fn parse_meta_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_number() {
        assert_eq!(parse_meta_number(Some("199000")), Some(199000.0));
        assert_eq!(parse_meta_number(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_meta_number(Some("")), None);
        assert_eq!(parse_meta_number(Some("n/a")), None);
        assert_eq!(parse_meta_number(None), None);
    }
}
