// src/types.rs
use serde::{Deserialize, Serialize};

/// A normalized job posting as stored in the cache file.
///
/// Every field is optional: the upstream search API omits fields freely and
/// older cache files may predate any of them, so readers default rather than
/// reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub posted_date: Option<String>,
}

impl JobRecord {
    /// One-line summary for terminal output.
    pub fn headline(&self) -> String {
        format!(
            "{} — {} ({})",
            self.title.as_deref().unwrap_or("(untitled)"),
            self.company.as_deref().unwrap_or("unknown company"),
            self.location.as_deref().unwrap_or("location n/a"),
        )
    }
}
