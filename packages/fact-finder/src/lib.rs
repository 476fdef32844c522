//! Entity Fact-Finder
//!
//! Takes a list of named entities from a table, runs one web search per
//! entity, and asks a language model to pull a single fact (an email
//! address, say) out of each entity's results.
//!
//! # Stages
//!
//! ```text
//! Table ──► entities ──► SearchRecord per entity ──► ExtractionRecord per record
//!                                                        │
//!                                    entity,extracted_info CSV ◄─┴─► spreadsheet write-back
//! ```
//!
//! Every stage runs sequentially and depends on the one before it. The
//! [`Session`] holds stage outputs and rejects a stage whose input is
//! missing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fact_finder::{Session, Template, SearchOptions, FixedDelay, NoProgress};
//! use fact_finder::testing::{MockSearcher, MockModel};
//!
//! let mut session = Session::new();
//! session.load_csv("people.csv")?;
//! session.select_column("Name")?;
//! session.search(&Template::new("Find the email of {entity}"), &searcher,
//!     &FixedDelay::default(), &NoProgress, &SearchOptions::default()).await?;
//! session.extract(&Template::default(), &model, &NoProgress).await?;
//! session.write_csv("extracted_data.csv")?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Provider seams (WebSearcher, CompletionModel, SheetStore)
//! - [`types`] - Table and per-entity records
//! - [`pipeline`] - The stage functions, templates, throttling and progress
//! - [`session`] - Stage sequencing and state
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod security;
pub mod session;
pub mod source;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::Config;
pub use error::{
    ColumnError, ExportError, FactFinderError, ModelError, ProviderError, Result, SourceError,
    StageError, WriteBackError,
};
pub use pipeline::{
    extract_entities, run_extraction, run_search, FixedDelay, NoDelay, NoProgress, Progress,
    SearchErrorPolicy, SearchOptions, Template, Throttle,
};
pub use session::{Session, WriteBack};
pub use source::{TableOrigin, TableSource};
pub use traits::{
    model::{CompletionModel, OpenAICompletion},
    searcher::{SearchOutcome, SerpApiSearcher, WebSearcher},
    sheet::{GoogleSheet, SheetStore},
};
pub use types::{
    records::{ExtractionRecord, SearchHit, SearchRecord, Warning, WarningKind},
    table::Table,
};
