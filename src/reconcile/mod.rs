//! # Catalog Reconciliation
//!
//! Cross-catalog consistency between the warehouse and the storefront:
//! tuple encoding, the comparison engine and the in-memory log of
//! recent runs.

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

pub mod engine;
pub mod report;
pub mod tuple;

pub use engine::{ReconcileEngine, DEFAULT_CONCURRENCY};
pub use report::{ProductComparison, SyncReport, SyncSummary, SyncVerdict};
pub use tuple::{SyncTuple, TupleError};

/// Kept runs in the in-memory history
const HISTORY_CAPACITY: usize = 50;

/// One completed reconciliation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRunRecord {
    pub id: String,
    /// RFC 3339 completion time
    pub timestamp: String,
    /// What started the run, e.g. `manual`
    pub trigger: String,
    /// Authenticated principal that started it
    pub user: String,
    pub processed: usize,
    pub in_sync: usize,
    pub needs_sync: usize,
    pub failed: usize,
}

/// In-memory ring of recent reconciliation runs.
///
/// The service is stateless across restarts; this exists only to back
/// the status and history endpoints for the current process.
#[derive(Debug, Default)]
pub struct SyncLog {
    runs: Mutex<Vec<SyncRunRecord>>,
}

impl SyncLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run, evicting the oldest past capacity
    pub fn record(&self, trigger: &str, user: &str, report: &SyncReport) -> SyncRunRecord {
        let record = SyncRunRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            trigger: trigger.to_string(),
            user: user.to_string(),
            processed: report.summary.total,
            in_sync: report.summary.in_sync,
            needs_sync: report.needs_sync.len(),
            failed: report.summary.errors,
        };

        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.push(record.clone());
        if runs.len() > HISTORY_CAPACITY {
            let excess = runs.len() - HISTORY_CAPACITY;
            runs.drain(..excess);
        }
        record
    }

    /// Most recent runs, newest first
    pub fn recent(&self, count: usize) -> Vec<SyncRunRecord> {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.iter().rev().take(count).cloned().collect()
    }

    /// The latest run, if any happened in this process
    pub fn last(&self) -> Option<SyncRunRecord> {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.last().cloned()
    }
}
