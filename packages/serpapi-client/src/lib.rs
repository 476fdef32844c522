//! Pure SerpAPI REST client.
//!
//! A minimal client for SerpAPI's Google engine. Returns the raw organic
//! results; deciding what an empty answer means is left to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use serpapi_client::{SerpApiClient, SearchParams};
//!
//! let client = SerpApiClient::new("your-api-key".into());
//!
//! let response = client.search(&SearchParams::google("Find the email address of Alice")).await?;
//! for result in response.organic_results.unwrap_or_default() {
//!     println!("{} - {}", result.title, result.link);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SerpApiError};
pub use types::{OrganicResult, SearchMetadata, SearchParams, SearchResponse};

use types::ErrorBody;

const BASE_URL: &str = "https://serpapi.com";

pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at another host (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run one search. A `200 OK` body is returned as-is, including the
    /// "no results" shape where `organic_results` is absent.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        if self.api_key.is_empty() {
            return Err(SerpApiError::MissingApiKey);
        }

        let start = std::time::Instant::now();
        let url = format!("{}/search.json", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            tracing::warn!(status = %status, error = %message, "SerpAPI error");
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: SearchResponse = resp.json().await?;
        tracing::debug!(
            query = %params.q,
            organic = response.organic_results.as_ref().map_or(0, Vec::len),
            duration_ms = start.elapsed().as_millis(),
            "SerpAPI search"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_sends_query_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google"))
            .and(query_param("q", "Find the email of Alice"))
            .and(query_param("num", "5"))
            .and(query_param("api_key", "serp-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organic_results": [
                    {"position": 1, "title": "Alice", "link": "https://alice.example", "snippet": "alice@alice.example"}
                ]
            })))
            .mount(&server)
            .await;

        let client = SerpApiClient::new("serp-key".into()).with_base_url(server.uri());
        let response = client
            .search(&SearchParams::google("Find the email of Alice").with_num(5))
            .await
            .unwrap();

        let results = response.organic_results.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link, "https://alice.example");
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "Invalid API key."})),
            )
            .mount(&server)
            .await;

        let client = SerpApiClient::new("bad".into()).with_base_url(server.uri());
        let err = client
            .search(&SearchParams::google("anything"))
            .await
            .unwrap_err();

        match err {
            SerpApiError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_without_request() {
        let client = SerpApiClient::new(String::new()).with_base_url("http://127.0.0.1:9");
        let err = client
            .search(&SearchParams::google("anything"))
            .await
            .unwrap_err();

        assert!(matches!(err, SerpApiError::MissingApiKey));
    }
}
