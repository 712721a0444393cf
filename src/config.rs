// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

pub const DEFAULT_CACHE_PATH: &str = "data/scraped_jobs.json";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Runtime configuration, resolved once at startup.
///
/// The search credential is optional on purpose: without it the fetcher
/// serves cached or demo data instead of failing.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rapidapi_key: Option<String>,
    pub ollama_host: String,
    pub ollama_model: String,
    pub cache_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
struct EnvironmentPaths {
    cache_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentPaths,
    production: EnvironmentPaths,
}

impl AppConfig {
    /// Load configuration from the environment, with best-effort `.env`
    /// support and an optional `config.yaml` for per-environment paths.
    /// Everything has a default; loading never fails.
    pub fn load() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let environment = Self::get_environment();
        let cache_path = match Self::cache_path_from_file(&environment) {
            Ok(Some(path)) => path,
            Ok(None) => PathBuf::from(DEFAULT_CACHE_PATH),
            Err(e) => {
                warn!("Ignoring unreadable config.yaml: {:#}", e);
                PathBuf::from(DEFAULT_CACHE_PATH)
            }
        };

        let rapidapi_key = std::env::var("RAPIDAPI_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if rapidapi_key.is_none() {
            info!("RAPIDAPI_KEY not set; live fetching disabled");
        }

        Self {
            rapidapi_key,
            ollama_host: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string()),
            ollama_model: std::env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string()),
            cache_path,
        }
    }

    fn get_environment() -> String {
        std::env::var("JOBHOUND_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn cache_path_from_file(environment: &str) -> Result<Option<PathBuf>> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;
        let config_file: ConfigFile =
            serde_yaml::from_str(&content).context("Failed to parse config.yaml")?;

        let paths = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };
        info!(
            "Loaded configuration for environment '{}' from config.yaml",
            environment
        );

        Ok(Some(paths.cache_path))
    }
}
