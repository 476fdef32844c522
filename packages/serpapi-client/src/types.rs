use serde::{Deserialize, Serialize};

/// Query parameters for a Google search through SerpAPI.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams {
    pub engine: String,
    pub q: String,
    /// Requested page size; Google may return fewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
}

impl SearchParams {
    pub fn google(query: impl Into<String>) -> Self {
        Self {
            engine: "google".to_string(),
            q: query.into(),
            num: None,
        }
    }

    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }
}

/// The subset of the SerpAPI response body this client reads.
///
/// SerpAPI answers `200 OK` with an `error` field and no `organic_results`
/// when Google returned nothing for the query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic_results: Option<Vec<OrganicResult>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub search_metadata: Option<SearchMetadata>,
}

/// A single organic (non-ad) Google result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub position: Option<u32>,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchMetadata {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_time_taken: Option<f64>,
}

/// Error body SerpAPI sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_is_optional() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"organic_results":[
                {"position":1,"title":"Alice Co","link":"https://alice.example","snippet":"Contact alice@alice.example"},
                {"position":2,"title":"Alice Blog","link":"https://blog.alice.example"}
            ]}"#,
        )
        .unwrap();

        let results = response.organic_results.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].snippet, None);
    }

    #[test]
    fn test_no_results_body() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"search_metadata":{"id":"abc","status":"Success"},
                "error":"Google hasn't returned any results for this query."}"#,
        )
        .unwrap();

        assert!(response.organic_results.is_none());
        assert!(response.error.is_some());
    }

    #[test]
    fn test_params_skip_unset_num() {
        let value = serde_json::to_value(SearchParams::google("rust")).unwrap();
        assert!(value.get("num").is_none());
        assert_eq!(value["engine"], "google");
    }
}
