//! Per-entity records produced by the search and extraction stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fact recorded for an entity whose completion request failed.
pub const ERROR_SENTINEL: &str = "Error";

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    /// Empty when the provider sent no snippet.
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
        }
    }
}

/// Search output for one entity. `results` is empty when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub entity: String,
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Extracted fact for one entity, or [`ERROR_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub entity: String,
    pub extracted_info: String,
}

impl ExtractionRecord {
    pub fn new(entity: impl Into<String>, extracted_info: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            extracted_info: extracted_info.into(),
        }
    }

    pub fn failed(entity: impl Into<String>) -> Self {
        Self::new(entity, ERROR_SENTINEL)
    }

    pub fn is_error(&self) -> bool {
        self.extracted_info == ERROR_SENTINEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The provider answered without organic results
    NoResults,
    /// The search request itself failed and the entity was skipped
    SearchFailed,
    /// The completion request failed and the sentinel was recorded
    CompletionFailed,
}

/// A non-fatal, user-visible notice about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub entity: String,
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn no_results(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self {
            message: format!("No results found for {entity}"),
            entity,
            kind: WarningKind::NoResults,
        }
    }

    pub fn search_failed(entity: impl Into<String>, error: &dyn std::error::Error) -> Self {
        let entity = entity.into();
        Self {
            message: format!("Search failed for {entity}: {error}"),
            entity,
            kind: WarningKind::SearchFailed,
        }
    }

    pub fn completion_failed(entity: impl Into<String>, error: &dyn std::error::Error) -> Self {
        let entity = entity.into();
        Self {
            message: format!("Error processing {entity}: {error}"),
            entity,
            kind: WarningKind::CompletionFailed,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Records of one stage run plus the warnings raised along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput<T> {
    pub records: Vec<T>,
    pub warnings: Vec<Warning>,
}

impl<T> Default for StageOutput<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
