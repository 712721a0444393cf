// src/fetcher.rs
//! Live job search against the JSearch API, with cache write-through and
//! cache-or-demo fallback on every failure path.

use crate::config::AppConfig;
use crate::store::JobStore;
use crate::types::JobRecord;
use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

pub const JSEARCH_URL: &str = "https://jsearch.p.rapidapi.com/search";
pub const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";

const FETCH_TIMEOUT_SECS: u64 = 20;

/// Recency filter accepted by the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateWindow {
    Day,
    Week,
    Month,
}

impl DateWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            DateWindow::Day => "day",
            DateWindow::Week => "week",
            DateWindow::Month => "month",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub location: Option<String>,
    pub remote_only: bool,
    pub date_posted: Option<DateWindow>,
    pub limit: usize,
}

impl SearchParams {
    /// The API ranks better when the location is folded into the query string
    /// instead of sent as a separate parameter.
    pub fn combined_query(&self) -> String {
        match self.location.as_deref() {
            Some(location) if !location.trim().is_empty() => {
                format!("{} in {}", self.query, location)
            }
            _ => self.query.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<RawJob>,
}

/// Third-party posting shape, reduced to the fields we map.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawJob {
    job_title: Option<String>,
    employer_name: Option<String>,
    job_city: Option<String>,
    job_country: Option<String>,
    job_state: Option<String>,
    job_min_salary: Option<serde_json::Value>,
    job_description: Option<String>,
    job_apply_link: Option<String>,
    job_google_link: Option<String>,
    job_posted_at_datetime_utc: Option<String>,
    job_posted_at_timestamp: Option<serde_json::Value>,
}

impl RawJob {
    fn into_record(self) -> JobRecord {
        let posted_timestamp = self
            .job_posted_at_timestamp
            .map(scalar_to_string)
            .filter(|s| !s.is_empty());

        JobRecord {
            title: self.job_title,
            company: self.employer_name,
            location: self.job_city.or(self.job_country).or(self.job_state),
            salary: self
                .job_min_salary
                .map(scalar_to_string)
                .filter(|s| !s.is_empty()),
            description: self.job_description,
            url: self.job_apply_link.or(self.job_google_link),
            posted_date: self.job_posted_at_datetime_utc.or(posted_timestamp),
        }
    }
}

fn scalar_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

pub struct JobFetcher {
    client: reqwest::Client,
    store: JobStore,
    api_key: Option<String>,
}

impl JobFetcher {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            store: JobStore::new(&config.cache_path),
            api_key: config.rapidapi_key.clone(),
        })
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Fetch live postings for the given search.
    ///
    /// Without a credential, and on any network or decode failure, this falls
    /// back to the cache-or-demo store instead of erroring. A successful fetch
    /// with zero results returns the empty list as-is; deciding whether to
    /// fall back then is the caller's call.
    pub async fn fetch(&self, params: &SearchParams) -> Vec<JobRecord> {
        let Some(api_key) = self.api_key.clone() else {
            warn!("RAPIDAPI_KEY not set, serving cached or demo jobs");
            return self.store.load_cached_or_demo(params.limit).await;
        };

        match self.fetch_live(&api_key, params).await {
            Ok(jobs) if jobs.is_empty() => {
                warn!("No jobs found for '{}'", params.combined_query());
                jobs
            }
            Ok(jobs) => {
                if let Err(e) = self.store.append_jobs(&jobs).await {
                    warn!("Failed to cache fetched jobs: {:#}", e);
                }
                info!("Added {} jobs for '{}'", jobs.len(), params.combined_query());
                jobs
            }
            Err(e) => {
                warn!("Error fetching jobs: {:#}", e);
                self.store.load_cached_or_demo(params.limit).await
            }
        }
    }

    async fn fetch_live(&self, api_key: &str, params: &SearchParams) -> Result<Vec<JobRecord>> {
        let combined = params.combined_query();
        info!(
            "Searching: '{}' (remote={}, date_posted={}, limit={})",
            combined,
            params.remote_only,
            params
                .date_posted
                .map(DateWindow::as_str)
                .unwrap_or("any"),
            params.limit
        );

        // Randomizing the page keeps repeated identical queries from
        // returning the exact same slice of results.
        let page = rand::rng().random_range(1..=3);

        let mut query: Vec<(&str, String)> = vec![
            ("query", combined),
            ("page", page.to_string()),
            ("num_pages", "1".to_string()),
            ("limit", params.limit.to_string()),
        ];
        if params.remote_only {
            query.push(("remote_jobs_only", "true".to_string()));
        }
        if let Some(window) = params.date_posted {
            query.push(("date_posted", window.as_str().to_string()));
        }

        let response = self
            .client
            .get(JSEARCH_URL)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", JSEARCH_HOST)
            .query(&query)
            .send()
            .await
            .context("Failed to reach job search API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Job search API returned {}: {}", status, body);
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .context("Failed to parse job search response")?;

        Ok(parsed.data.into_iter().map(RawJob::into_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_query_embeds_location() {
        let params = SearchParams {
            query: "Data Scientist".to_string(),
            location: Some("Pune".to_string()),
            remote_only: false,
            date_posted: None,
            limit: 8,
        };
        assert_eq!(params.combined_query(), "Data Scientist in Pune");
    }

    #[test]
    fn test_combined_query_without_location() {
        let params = SearchParams {
            query: "Data Scientist".to_string(),
            location: Some("   ".to_string()),
            remote_only: false,
            date_posted: None,
            limit: 8,
        };
        assert_eq!(params.combined_query(), "Data Scientist");
    }

    #[test]
    fn test_date_window_strings() {
        assert_eq!(DateWindow::Day.as_str(), "day");
        assert_eq!(DateWindow::Week.as_str(), "week");
        assert_eq!(DateWindow::Month.as_str(), "month");
    }

    #[test]
    fn test_normalization_field_fallbacks() {
        let raw: SearchResponse = serde_json::from_str(
            r#"{
                "data": [{
                    "job_title": "Backend Engineer",
                    "employer_name": "Initech",
                    "job_country": "DE",
                    "job_min_salary": 85000,
                    "job_description": "Rust services",
                    "job_google_link": "https://jobs.example/123",
                    "job_posted_at_timestamp": 1730246400
                }]
            }"#,
        )
        .unwrap();

        let record = raw.data.into_iter().next().unwrap().into_record();
        assert_eq!(record.title.as_deref(), Some("Backend Engineer"));
        // No city, so location falls back to country.
        assert_eq!(record.location.as_deref(), Some("DE"));
        assert_eq!(record.salary.as_deref(), Some("85000"));
        // No apply link, so the google link is used.
        assert_eq!(record.url.as_deref(), Some("https://jobs.example/123"));
        // No ISO datetime, so the raw timestamp is kept.
        assert_eq!(record.posted_date.as_deref(), Some("1730246400"));
    }

    #[test]
    fn test_normalization_prefers_primary_fields() {
        let raw: SearchResponse = serde_json::from_str(
            r#"{
                "data": [{
                    "job_city": "Berlin",
                    "job_country": "DE",
                    "job_state": "BE",
                    "job_apply_link": "https://apply.example",
                    "job_google_link": "https://google.example",
                    "job_posted_at_datetime_utc": "2025-10-30T08:00:00Z",
                    "job_posted_at_timestamp": 1730246400
                }]
            }"#,
        )
        .unwrap();

        let record = raw.data.into_iter().next().unwrap().into_record();
        assert_eq!(record.location.as_deref(), Some("Berlin"));
        assert_eq!(record.url.as_deref(), Some("https://apply.example"));
        assert_eq!(record.posted_date.as_deref(), Some("2025-10-30T08:00:00Z"));
    }

    #[test]
    fn test_normalization_of_sparse_posting() {
        let raw: SearchResponse = serde_json::from_str(r#"{"data": [{}]}"#).unwrap();
        let record = raw.data.into_iter().next().unwrap().into_record();
        assert_eq!(record, JobRecord::default());
        assert!(record.salary.is_none());
    }

    #[test]
    fn test_response_without_data_array() {
        let raw: SearchResponse = serde_json::from_str(r#"{"status": "OK"}"#).unwrap();
        assert!(raw.data.is_empty());
    }
}
