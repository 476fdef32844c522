use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::{DEFAULT_MAX_RESULTS, DEFAULT_SEARCH_DELAY};
use crate::security::{secret_from, SecretString};
use crate::traits::model::DEFAULT_MODEL;

pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent keys disable the stage that needs them
    pub serpapi_api_key: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub model: String,
    pub credentials_path: PathBuf,
    pub search_delay: Duration,
    pub max_results: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let search_delay_ms: u64 = match var("FACT_FINDER_SEARCH_DELAY_MS") {
            Some(value) => value
                .trim()
                .parse()
                .context("FACT_FINDER_SEARCH_DELAY_MS must be a number of milliseconds")?,
            None => DEFAULT_SEARCH_DELAY.as_millis() as u64,
        };

        let max_results = match var("FACT_FINDER_MAX_RESULTS") {
            Some(value) => value
                .trim()
                .parse()
                .context("FACT_FINDER_MAX_RESULTS must be a positive number")?,
            None => DEFAULT_MAX_RESULTS,
        };
        anyhow::ensure!(max_results > 0, "FACT_FINDER_MAX_RESULTS must be at least 1");

        Ok(Self {
            serpapi_api_key: var("SERPAPI_API_KEY").and_then(secret_from),
            openai_api_key: var("OPENAI_API_KEY").and_then(secret_from),
            model: var("FACT_FINDER_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            credentials_path: var("GOOGLE_APPLICATION_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            search_delay: Duration::from_millis(search_delay_ms),
            max_results,
        })
    }
}
