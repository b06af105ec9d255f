//! # Reconciliation Report
//!
//! Output types of a reconciliation run: one comparison per tuple, the
//! per-item error list, counters and the compact re-sync payload for
//! downstream batch update.

use serde::Serialize;

/// Sync state of one product across both catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncVerdict {
    #[serde(rename = "in-sync")]
    InSync,
    #[serde(rename = "out-of-sync")]
    OutOfSync,
    #[serde(rename = "absent-in-storefront")]
    AbsentInStorefront,
}

/// One product compared across both catalogs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductComparison {
    pub code: String,
    pub price_now: f64,
    pub price_before: f64,
    pub stock: i64,
    pub storefront_regular_price: Option<f64>,
    pub storefront_current_price: Option<f64>,
    pub storefront_stock: Option<i64>,
    pub verdict: SyncVerdict,
    pub needs_sync: bool,
}

/// Counters over one reconciliation run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub total: usize,
    pub in_sync: usize,
    pub out_of_sync: usize,
    pub absent: usize,
    pub errors: usize,
}

/// Full result of a reconciliation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// True when no tuple failed to parse and no lookup errored
    pub success: bool,
    pub comparisons: Vec<ProductComparison>,
    /// Codes already in sync
    pub synchronized: Vec<String>,
    /// Codes whose storefront state must be updated
    pub needs_sync: Vec<String>,
    /// Per-item failures (malformed tuples, lookup errors)
    pub errors: Vec<String>,
    /// Compact `code:price:stock:priorPrice,...` payload covering the
    /// needs-sync subset
    pub resync_payload: String,
    pub summary: SyncSummary,
}
