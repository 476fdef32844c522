//! Testing utilities including mock implementations.
//!
//! Scripted searchers, models and sheets for exercising the pipeline
//! without network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ModelError, ProviderError, SourceError, WriteBackError};
use crate::pipeline::progress::Progress;
use crate::pipeline::throttle::Throttle;
use crate::traits::model::CompletionModel;
use crate::traits::searcher::{SearchOutcome, WebSearcher};
use crate::traits::sheet::SheetStore;
use crate::types::records::{SearchHit, Warning};

/// `n` distinct hits.
pub fn hits(n: usize) -> Vec<SearchHit> {
    (1..=n)
        .map(|i| {
            SearchHit::new(
                format!("Result {i}"),
                format!("https://example.com/{i}"),
                format!("snippet {i}"),
            )
        })
        .collect()
}

enum Scripted {
    Outcome(SearchOutcome),
    Failure(String),
}

/// Answers by exact query; unscripted queries return no results.
#[derive(Default)]
pub struct MockSearcher {
    responses: HashMap<String, Scripted>,
    calls: RwLock<Vec<(String, usize)>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.responses
            .insert(query.to_string(), Scripted::Outcome(SearchOutcome::hits(hits)));
        self
    }

    pub fn with_no_results(mut self, query: &str) -> Self {
        self.responses
            .insert(query.to_string(), Scripted::Outcome(SearchOutcome::empty()));
        self
    }

    pub fn with_failure(mut self, query: &str, message: &str) -> Self {
        self.responses
            .insert(query.to_string(), Scripted::Failure(message.to_string()));
        self
    }

    /// `(query, limit)` for every request, in order.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, ProviderError> {
        self.calls.write().unwrap().push((query.to_string(), limit));

        match self.responses.get(query) {
            Some(Scripted::Outcome(outcome)) => Ok(outcome.clone()),
            Some(Scripted::Failure(message)) => Err(ProviderError::Request {
                query: query.to_string(),
                source: message.clone().into(),
            }),
            None => Ok(SearchOutcome::empty()),
        }
    }
}

/// Replies by prompt substring, first match wins; otherwise replies `"n/a"`.
#[derive(Default)]
pub struct MockModel {
    rules: Vec<(String, Option<String>)>,
    prompts: RwLock<Vec<String>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_when(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push((needle.to_string(), Some(reply.to_string())));
        self
    }

    pub fn fail_when(mut self, needle: &str) -> Self {
        self.rules.push((needle.to_string(), None));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.write().unwrap().push(prompt.to_string());

        match self.rules.iter().find(|(needle, _)| prompt.contains(needle)) {
            Some((_, Some(reply))) => Ok(reply.clone()),
            Some((_, None)) => Err(ModelError::Request("rate limited".into())),
            None => Ok("n/a".to_string()),
        }
    }
}

/// In-memory sheet that records every write.
pub struct MockSheetStore {
    spreadsheet_id: String,
    rows: Vec<Vec<String>>,
    writes: RwLock<Vec<(String, Vec<Vec<String>>)>>,
    fail_writes: bool,
}

impl MockSheetStore {
    pub fn new(spreadsheet_id: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            rows,
            writes: RwLock::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<(String, Vec<Vec<String>>)> {
        self.writes.read().unwrap().clone()
    }
}

#[async_trait]
impl SheetStore for MockSheetStore {
    fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn read_range(&self, _range: &str) -> Result<Vec<Vec<String>>, SourceError> {
        Ok(self.rows.clone())
    }

    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), WriteBackError> {
        if self.fail_writes {
            return Err(WriteBackError::Request {
                range: range.to_string(),
                source: "permission denied".into(),
            });
        }
        self.writes.write().unwrap().push((range.to_string(), rows));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingThrottle {
    pauses: RwLock<usize>,
}

impl RecordingThrottle {
    pub fn pauses(&self) -> usize {
        *self.pauses.read().unwrap()
    }
}

#[async_trait]
impl Throttle for RecordingThrottle {
    async fn pause(&self) {
        *self.pauses.write().unwrap() += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingProgress {
    steps: RwLock<Vec<(usize, usize)>>,
    warnings: RwLock<Vec<Warning>>,
}

impl RecordingProgress {
    pub fn steps(&self) -> Vec<(usize, usize)> {
        self.steps.read().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.read().unwrap().clone()
    }
}

impl Progress for RecordingProgress {
    fn advance(&self, done: usize, total: usize) {
        self.steps.write().unwrap().push((done, total));
    }

    fn warn(&self, warning: &Warning) {
        self.warnings.write().unwrap().push(warning.clone());
    }
}
