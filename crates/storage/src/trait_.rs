//! Storage trait abstraction.

use async_trait::async_trait;
use contentgate_core::{ImprovementOutcome, ReviewId, RunId, SafetyReport, SafetyVerdict, Time};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Filter for listing review reports.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Keep only these verdicts
    pub verdicts: Option<Vec<SafetyVerdict>>,

    /// Keep only reports created at or after this time
    pub since: Option<Time>,

    /// Return at most this many reports
    pub limit: Option<usize>,
}

impl ReportFilter {
    /// Whether a report passes the verdict and time filters.
    pub fn matches(&self, report: &SafetyReport) -> bool {
        if let Some(verdicts) = &self.verdicts {
            if !verdicts.contains(&report.verdict) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if report.created_at < since {
                return false;
            }
        }
        true
    }
}

/// Storage abstraction for review history.
///
/// Listings are newest first.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    // === Review reports ===

    /// Save a report (create or update).
    async fn save_report(&mut self, report: &SafetyReport) -> Result<()>;

    /// Load a report by ID.
    async fn load_report(&self, id: ReviewId) -> Result<Option<SafetyReport>>;

    /// List reports matching the filter.
    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<SafetyReport>>;

    /// Delete a report.
    async fn delete_report(&mut self, id: ReviewId) -> Result<()>;

    // === Improvement runs ===

    /// Save an improvement run.
    async fn save_run(&mut self, run: &ImprovementOutcome) -> Result<()>;

    /// Load a run by ID.
    async fn load_run(&self, id: RunId) -> Result<Option<ImprovementOutcome>>;

    /// List runs, at most `limit` when set.
    async fn list_runs(&self, limit: Option<usize>) -> Result<Vec<ImprovementOutcome>>;
}
