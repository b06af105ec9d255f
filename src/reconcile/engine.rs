//! # Reconciliation Engine
//!
//! Compares a batch of warehouse sync tuples against the storefront's
//! current price/stock state. Lookups for different codes are
//! independent and run concurrently with a fixed in-flight cap so a
//! large batch cannot overwhelm the storefront database. A failure on
//! one code never aborts the others; it becomes a per-item error in the
//! report.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::storefront::{StorefrontProduct, StorefrontReader};

use super::report::{ProductComparison, SyncReport, SyncSummary, SyncVerdict};
use super::tuple::SyncTuple;

/// In-flight storefront lookups per batch
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Batch reconciliation over a storefront reader
pub struct ReconcileEngine<S> {
    storefront: Arc<S>,
    concurrency: usize,
}

impl<S: StorefrontReader> ReconcileEngine<S> {
    pub fn new(storefront: Arc<S>) -> Self {
        Self {
            storefront,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    #[cfg(test)]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Reconcile a batch of raw tuple strings.
    ///
    /// Malformed tuples are skipped and counted as errors; valid ones
    /// fan out to concurrent storefront lookups. Comparison order
    /// follows input order regardless of lookup completion order.
    pub async fn run(&self, inputs: &[String]) -> SyncReport {
        let mut errors = Vec::new();
        let mut parsed = Vec::new();

        for (idx, raw) in inputs.iter().enumerate() {
            match SyncTuple::parse(raw) {
                Ok(tuple) => parsed.push((idx, tuple)),
                Err(e) => errors.push(format!("{}: {e}", raw.trim())),
            }
        }

        let mut outcomes: Vec<(usize, Result<ProductComparison, String>)> =
            stream::iter(parsed)
                .map(|(idx, tuple)| {
                    let storefront = Arc::clone(&self.storefront);
                    async move {
                        match storefront.lookup(&tuple.code).await {
                            Ok(found) => (idx, Ok(classify(&tuple, found.as_ref()))),
                            Err(e) => (idx, Err(format!("{}: lookup failed: {e}", tuple.code))),
                        }
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut comparisons = Vec::new();
        let mut synchronized = Vec::new();
        let mut needs_sync = Vec::new();
        let mut resync_entries = Vec::new();
        let mut summary = SyncSummary {
            total: inputs.len(),
            ..SyncSummary::default()
        };

        for (_, outcome) in outcomes {
            match outcome {
                Ok(comparison) => {
                    match comparison.verdict {
                        SyncVerdict::InSync => {
                            summary.in_sync += 1;
                            synchronized.push(comparison.code.clone());
                        }
                        SyncVerdict::OutOfSync => summary.out_of_sync += 1,
                        SyncVerdict::AbsentInStorefront => summary.absent += 1,
                    }
                    if comparison.needs_sync {
                        needs_sync.push(comparison.code.clone());
                        resync_entries.push(
                            SyncTuple {
                                code: comparison.code.clone(),
                                price_now: comparison.price_now,
                                price_before: comparison.price_before,
                                stock: comparison.stock,
                            }
                            .export(),
                        );
                    }
                    comparisons.push(comparison);
                }
                Err(message) => errors.push(message),
            }
        }

        summary.errors = errors.len();

        SyncReport {
            success: errors.is_empty(),
            comparisons,
            synchronized,
            needs_sync,
            resync_payload: resync_entries.join(","),
            errors,
            summary,
        }
    }
}

/// Classify one tuple against the storefront record for its code.
///
/// In sync means current price, stock and prior price all match
/// exactly, comparing prices as integers after rounding. A missing
/// storefront field counts as a mismatch, not a match.
pub fn classify(tuple: &SyncTuple, product: Option<&StorefrontProduct>) -> ProductComparison {
    let (verdict, product) = match product {
        None => (SyncVerdict::AbsentInStorefront, None),
        Some(p) => {
            let price_match = p.current_price.map(round) == Some(round(tuple.price_now));
            let prior_match = p.regular_price.map(round) == Some(round(tuple.price_before));
            let stock_match = p.stock == Some(tuple.stock);

            let verdict = if price_match && prior_match && stock_match {
                SyncVerdict::InSync
            } else {
                SyncVerdict::OutOfSync
            };
            (verdict, Some(p))
        }
    };

    ProductComparison {
        code: tuple.code.clone(),
        price_now: tuple.price_now,
        price_before: tuple.price_before,
        stock: tuple.stock,
        storefront_regular_price: product.and_then(|p| p.regular_price),
        storefront_current_price: product.and_then(|p| p.current_price),
        storefront_stock: product.and_then(|p| p.stock),
        verdict,
        needs_sync: verdict != SyncVerdict::InSync,
    }
}

fn round(v: f64) -> i64 {
    v.round() as i64
}
