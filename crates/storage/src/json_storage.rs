//! JSON file storage implementation.
//!
//! Stores reports and runs as JSON files under the store directory and keeps
//! small per-object meta markers (version + updated_at).

use std::path::{Path, PathBuf};
use contentgate_core::{ImprovementOutcome, ReviewId, RunId, SafetyReport};
use super::{ReportFilter, ReviewStore, StorageError, Result};
use tokio::fs;
use tracing::debug;

/// File-based JSON store.
pub struct JsonReviewStore {
    root: PathBuf,
}

impl JsonReviewStore {
    /// Open a store, creating the `reports/`, `runs/` and meta directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("reports")).await?;
        fs::create_dir_all(root.join("runs")).await?;

        fs::create_dir_all(root.join("meta").join("reports")).await?;
        fs::create_dir_all(root.join("meta").join("runs")).await?;

        Ok(Self { root })
    }

    /// Store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn report_path(&self, id: ReviewId) -> PathBuf {
        self.root.join("reports").join(format!("{}.json", id))
    }
    fn run_path(&self, id: RunId) -> PathBuf {
        self.root.join("runs").join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    /// Current version of a stored object, 0 if it was never saved.
    pub async fn version(&self, kind: &str, id: &str) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path(kind, id)).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let version = self.version(kind, id).await.unwrap_or(0) + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(kind, id), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl ReviewStore for JsonReviewStore {
    async fn save_report(&mut self, report: &SafetyReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(self.report_path(report.id), json.as_bytes()).await?;

        let version = self.bump_version("reports", &report.id.to_string()).await?;
        debug!("Saved report {} (v{})", report.id, version);
        Ok(())
    }

    async fn load_report(&self, id: ReviewId) -> Result<Option<SafetyReport>> {
        read_json(&self.report_path(id)).await
    }

    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<SafetyReport>> {
        let mut reports: Vec<SafetyReport> = list_dir(&self.root.join("reports"))
            .await?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            reports.truncate(limit);
        }
        Ok(reports)
    }

    async fn delete_report(&mut self, id: ReviewId) -> Result<()> {
        match fs::remove_file(self.report_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("report {}", id)));
            }
            Err(e) => return Err(e.into()),
        }
        let _ = fs::remove_file(self.meta_path("reports", &id.to_string())).await;
        Ok(())
    }

    async fn save_run(&mut self, run: &ImprovementOutcome) -> Result<()> {
        let json = serde_json::to_string_pretty(run)?;
        fs::write(self.run_path(run.id), json.as_bytes()).await?;

        let version = self.bump_version("runs", &run.id.to_string()).await?;
        debug!("Saved run {} (v{})", run.id, version);
        Ok(())
    }

    async fn load_run(&self, id: RunId) -> Result<Option<ImprovementOutcome>> {
        read_json(&self.run_path(id)).await
    }

    async fn list_runs(&self, limit: Option<usize>) -> Result<Vec<ImprovementOutcome>> {
        let mut runs: Vec<ImprovementOutcome> = list_dir(&self.root.join("runs")).await?;
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        if let Some(limit) = limit {
            runs.truncate(limit);
        }
        Ok(runs)
    }
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => debug!("Skipping unreadable {}: {}", entry.path().display(), e),
        }
    }
    Ok(items)
}
