// src/assistant/model_client.rs
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const CHAT_TIMEOUT_SECS: u64 = 120;
const PROBE_TIMEOUT_SECS: u64 = 2;

/// Chat client for a local Ollama instance.
///
/// Availability is probed once at construction and carried as a plain flag,
/// so callers branch on `available()` instead of swallowing connection
/// errors at every call site.
pub struct ModelClient {
    client: reqwest::Client,
    host: String,
    model: String,
    available: bool,
}

impl ModelClient {
    /// Build a client and probe the endpoint once.
    pub async fn detect(host: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CHAT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        let host = host.trim_end_matches('/').to_string();
        let available = match client
            .get(format!("{}/api/tags", host))
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Local model probe returned {}", response.status());
                false
            }
            Err(e) => {
                warn!("Local model not reachable at {}: {}", host, e);
                false
            }
        };

        if available {
            info!("Local model '{}' available at {}", model, host);
        }

        Self {
            client,
            host,
            model: model.to_string(),
            available,
        }
    }

    /// Test-only constructor that skips the probe.
    #[cfg(test)]
    pub fn offline(model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: String::new(),
            model: model.to_string(),
            available: false,
        }
    }

    pub fn available(&self) -> bool {
        self.available
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user message and return the completion text.
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.host);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach local model")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Local model returned {}: {}", status, body);
        }

        let value: Value = response
            .json()
            .await
            .context("Failed to parse local model response")?;

        value
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|text| text.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Local model response had no message content"))
    }
}
