// src/store.rs
//! Flat-file persistence for fetched job postings.
//!
//! The store is a single pretty-printed JSON array, rewritten wholesale on
//! every append. There is no lock around the read-modify-write, so two
//! concurrent writers can lose an update; the tool is single-user and
//! single-process, and that limitation is accepted rather than engineered
//! around.

use crate::types::JobRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct JobStore {
    path: PathBuf,
}

/// Snapshot of the cache file for status display.
#[derive(Debug, Clone)]
pub struct CacheMeta {
    pub records: usize,
    pub updated: Option<DateTime<Utc>>,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append records to the persisted list.
    ///
    /// A missing or corrupt cache file counts as an empty list; corruption is
    /// logged and overwritten, never surfaced to the caller.
    pub async fn append_jobs(&self, new_records: &[JobRecord]) -> Result<()> {
        let mut all = self.read_existing().await;
        all.extend_from_slice(new_records);

        let content =
            serde_json::to_string_pretty(&all).context("Failed to serialize job cache")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create cache directory: {}", parent.display())
                })?;
            }
        }

        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write job cache: {}", self.path.display()))
    }

    /// Return up to `limit` cached records, or the built-in demo set when the
    /// cache is missing or empty. This never fails; it is the terminal
    /// fallback of the whole fetch pipeline.
    pub async fn load_cached_or_demo(&self, limit: usize) -> Vec<JobRecord> {
        let cached = self.read_existing().await;
        if !cached.is_empty() {
            info!("Loaded {} cached jobs from {}", cached.len(), self.path.display());
            return cached.into_iter().take(limit).collect();
        }

        info!("Job cache empty, serving built-in demo jobs");
        demo_jobs()
    }

    /// Record count and last-modified time of the cache file.
    pub async fn cached_meta(&self) -> CacheMeta {
        let records = self.read_existing().await.len();
        let updated = tokio::fs::metadata(&self.path)
            .await
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Utc>::from);

        CacheMeta { records, updated }
    }

    async fn read_existing(&self) -> Vec<JobRecord> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(
                    "Ignoring unreadable job cache {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}

/// Fixed two-record sample returned when nothing has ever been fetched.
pub fn demo_jobs() -> Vec<JobRecord> {
    vec![
        JobRecord {
            title: Some("Demo Data Scientist".to_string()),
            company: Some("Sample Analytics".to_string()),
            location: Some("Pune".to_string()),
            salary: Some("15-20 LPA".to_string()),
            description: Some(
                "Work on ML pipelines, SQL, Python, and stakeholder presentations. Growth opportunity."
                    .to_string(),
            ),
            url: Some("https://example.com/apply-demo-ds".to_string()),
            posted_date: Some("2025-10-30".to_string()),
        },
        JobRecord {
            title: Some("Demo AI Engineer".to_string()),
            company: Some("Demo AI Innovations".to_string()),
            location: Some("Remote".to_string()),
            salary: Some("12-18 LPA".to_string()),
            description: Some(
                "Develop, tune, and deploy deep learning models in production for Indian clients."
                    .to_string(),
            ),
            url: Some("https://example.com/apply-demo-ai".to_string()),
            posted_date: Some("2025-10-29".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> JobRecord {
        JobRecord {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            ..JobRecord::default()
        }
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("jobs.json"));

        let batch = vec![record("First"), record("Second"), record("Third")];
        store.append_jobs(&batch).await.unwrap();

        let loaded = store.load_cached_or_demo(10).await;
        assert_eq!(loaded, batch);
    }

    #[tokio::test]
    async fn test_append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("jobs.json"));

        store.append_jobs(&[record("First")]).await.unwrap();
        store.append_jobs(&[record("Second")]).await.unwrap();

        let loaded = store.load_cached_or_demo(10).await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title.as_deref(), Some("First"));
        assert_eq!(loaded[1].title.as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn test_limit_applies_to_cached_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("jobs.json"));

        let batch: Vec<JobRecord> = (0..5).map(|i| record(&format!("Job {i}"))).collect();
        store.append_jobs(&batch).await.unwrap();

        assert_eq!(store.load_cached_or_demo(2).await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_cache_returns_demo_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("absent.json"));

        let first = store.load_cached_or_demo(8).await;
        let second = store.load_cached_or_demo(8).await;
        assert_eq!(first, demo_jobs());
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = JobStore::new(&path);
        assert_eq!(store.load_cached_or_demo(8).await, demo_jobs());

        // Appending over a corrupt file starts from an empty list.
        store.append_jobs(&[record("Fresh")]).await.unwrap();
        let loaded = store.load_cached_or_demo(8).await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title.as_deref(), Some("Fresh"));
    }

    #[tokio::test]
    async fn test_cached_meta() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("jobs.json"));

        let empty = store.cached_meta().await;
        assert_eq!(empty.records, 0);
        assert!(empty.updated.is_none());

        store.append_jobs(&[record("One"), record("Two")]).await.unwrap();
        let meta = store.cached_meta().await;
        assert_eq!(meta.records, 2);
        assert!(meta.updated.is_some());
    }

    #[tokio::test]
    async fn test_reader_tolerates_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        tokio::fs::write(&path, r#"[{"title": "Bare"}]"#).await.unwrap();

        let store = JobStore::new(&path);
        let loaded = store.load_cached_or_demo(8).await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title.as_deref(), Some("Bare"));
        assert!(loaded[0].company.is_none());
    }
}
