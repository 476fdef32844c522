//! Typed errors for the fact-finder pipeline.
//!
//! Library code returns these `thiserror` enums; the binary wraps them in
//! `anyhow` at the edges.

use thiserror::Error;

use crate::security::Service;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Loading a table failed. Blocks every later stage.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Delimited text could not be parsed
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    /// No header line / header row
    #[error("table has no header row")]
    MissingHeader,

    /// Two columns share a name, so selection by name is ambiguous
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A data row is wider than the header
    #[error("row {row} has {found} cells but the header has {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// The spreadsheet URL has no resource id segment
    #[error("invalid spreadsheet locator: {0}")]
    InvalidLocator(String),

    /// Credentials could not be loaded or were rejected
    #[error("authentication failed: {0}")]
    Auth(#[source] BoxError),

    /// The fetched range returned no rows at all
    #[error("range {range} is empty")]
    EmptyRange { range: String },

    /// Any other failure while fetching the remote range
    #[error("failed to fetch range {range}: {source}")]
    Fetch {
        range: String,
        #[source]
        source: BoxError,
    },
}

/// Selecting the entity column failed.
#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("unknown column `{column}`; available columns: {}", .available.join(", "))]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },
}

/// A search request failed (as opposed to returning no results).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("search for `{query}` failed: {source}")]
    Request {
        query: String,
        #[source]
        source: BoxError,
    },
}

/// A completion request failed.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("completion failed: {0}")]
    Request(#[source] BoxError),
}

/// Overwriting the remote range failed. Never affects the local export.
#[derive(Debug, Error)]
pub enum WriteBackError {
    #[error("failed to write range {range}: {source}")]
    Request {
        range: String,
        #[source]
        source: BoxError,
    },
}

/// Writing the downloadable artifact failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A stage was triggered before its inputs exist.
#[derive(Debug, Error)]
pub enum StageError {
    /// The credential a stage needs is absent or blank
    #[error("{service} credential is missing")]
    MissingCredential { service: Service },

    /// The previous stage has not produced its output yet
    #[error("cannot run {stage}: {requires} first")]
    NotReady {
        stage: &'static str,
        requires: &'static str,
    },

    /// A search failure under the abort policy
    #[error(transparent)]
    Search(#[from] ProviderError),
}

/// Any error surfaced by a [`Session`](crate::session::Session) operation.
#[derive(Debug, Error)]
pub enum FactFinderError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, FactFinderError>;
