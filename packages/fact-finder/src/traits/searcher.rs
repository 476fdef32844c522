//! Web search trait.
//!
//! The search stage only needs "query in, organic results out". Keeping the
//! provider behind a trait lets tests script responses per query.

use async_trait::async_trait;
use serpapi_client::{SearchParams, SerpApiClient};

use crate::error::{ProviderError, StageError};
use crate::security::{require_secret, SecretString, Service};
use crate::types::records::SearchHit;

/// What the provider returned for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` when the response carried no organic results at all.
    pub organic: Option<Vec<SearchHit>>,
    /// Provider-supplied explanation, e.g. "Google hasn't returned any results".
    pub notice: Option<String>,
}

impl SearchOutcome {
    pub fn hits(hits: Vec<SearchHit>) -> Self {
        Self {
            organic: Some(hits),
            notice: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Run one query, asking for at most `limit` results.
    async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, ProviderError>;
}

/// SerpAPI (Google engine) backed searcher.
pub struct SerpApiSearcher {
    client: SerpApiClient,
}

impl SerpApiSearcher {
    /// Rejects an absent or blank key before any request is made.
    pub fn new(api_key: Option<&SecretString>) -> Result<Self, StageError> {
        let key = require_secret(api_key, Service::SerpApi)?;
        Ok(Self::with_client(SerpApiClient::new(key.to_string())))
    }

    pub fn with_client(client: SerpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebSearcher for SerpApiSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, ProviderError> {
        let num = u32::try_from(limit).unwrap_or(u32::MAX);
        let response = self
            .client
            .search(&SearchParams::google(query).with_num(num))
            .await
            .map_err(|e| ProviderError::Request {
                query: query.to_string(),
                source: Box::new(e),
            })?;

        let organic = response.organic_results.map(|results| {
            results
                .into_iter()
                .map(|r| SearchHit::new(r.title, r.link, r.snippet.unwrap_or_default()))
                .collect()
        });

        Ok(SearchOutcome {
            organic,
            notice: response.error,
        })
    }
}
