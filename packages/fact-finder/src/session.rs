//! Session context.
//!
//! A [`Session`] holds the output of every stage that has run so far. Each
//! stage reads its predecessor's output and overwrites only its own slot;
//! a stage whose input is missing is rejected with [`StageError::NotReady`].
//!
//! ```text
//! load ──► select_column ──► search ──► extract ──► export / write_back
//! ```

use std::path::Path;

use tracing::info;

use crate::error::{Result, StageError, WriteBackError};
use crate::pipeline::{self, Progress, SearchOptions, Template, Throttle};
use crate::source::{self, TableOrigin, TableSource};
use crate::traits::model::CompletionModel;
use crate::traits::searcher::WebSearcher;
use crate::traits::sheet::SheetStore;
use crate::types::records::{ExtractionRecord, SearchRecord, Warning};
use crate::types::table::Table;

/// Outcome of a write-back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBack {
    /// The remote range was overwritten
    Written { rows: usize },
    /// The session has no spreadsheet to write to
    Skipped,
}

#[derive(Default)]
pub struct Session {
    origin: Option<TableOrigin>,
    table: Option<Table>,
    sheet: Option<Box<dyn SheetStore>>,
    column: Option<String>,
    entities: Option<Vec<String>>,
    search_records: Option<Vec<SearchRecord>>,
    extraction_records: Option<Vec<ExtractionRecord>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load from either source kind.
    pub async fn load(&mut self, source: &TableSource, credentials_path: &Path) -> Result<&Table> {
        let loaded = source.load(credentials_path).await?;
        Ok(self.replace_table(loaded.table, loaded.origin, loaded.store))
    }

    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<&Table> {
        let path = path.as_ref();
        let table = source::load_csv(path)?;
        let origin = TableOrigin::Upload {
            path: path.to_path_buf(),
        };
        Ok(self.replace_table(table, origin, None))
    }

    /// Load from an already-authenticated spreadsheet handle.
    pub async fn load_sheet(
        &mut self,
        store: Box<dyn SheetStore>,
        locator: impl Into<String>,
    ) -> Result<&Table> {
        let table = source::fetch_sheet_table(store.as_ref()).await?;
        let origin = TableOrigin::Sheet {
            locator: locator.into(),
            spreadsheet_id: store.spreadsheet_id().to_string(),
        };
        Ok(self.replace_table(table, origin, Some(store)))
    }

    /// A new table invalidates every stage output derived from the old one.
    fn replace_table(
        &mut self,
        table: Table,
        origin: TableOrigin,
        sheet: Option<Box<dyn SheetStore>>,
    ) -> &Table {
        self.origin = Some(origin);
        self.sheet = sheet;
        self.column = None;
        self.entities = None;
        self.search_records = None;
        self.extraction_records = None;
        &*self.table.insert(table)
    }

    // ------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------

    /// Select the entity column of the loaded table.
    pub fn select_column(&mut self, column: &str) -> Result<&[String]> {
        let table = self.table.as_ref().ok_or(StageError::NotReady {
            stage: "column selection",
            requires: "load a table",
        })?;

        let entities = pipeline::extract_entities(table, column)?;
        info!(column, entities = entities.len(), "Selected entity column");

        self.column = Some(column.to_string());
        Ok(self.entities.insert(entities).as_slice())
    }

    /// Run the search stage over the selected entities.
    pub async fn search(
        &mut self,
        template: &Template,
        searcher: &dyn WebSearcher,
        throttle: &dyn Throttle,
        progress: &dyn Progress,
        options: &SearchOptions,
    ) -> Result<Vec<Warning>> {
        let entities = self.entities.as_deref().ok_or(StageError::NotReady {
            stage: "search",
            requires: "select an entity column",
        })?;

        let output = pipeline::run_search(entities, template, searcher, throttle, progress, options)
            .await
            .map_err(StageError::from)?;

        self.search_records = Some(output.records);
        Ok(output.warnings)
    }

    /// Run the extraction stage over the latest search records.
    pub async fn extract(
        &mut self,
        template: &Template,
        model: &dyn CompletionModel,
        progress: &dyn Progress,
    ) -> Result<Vec<Warning>> {
        let records = self.search_records.as_deref().ok_or(StageError::NotReady {
            stage: "extraction",
            requires: "run the search",
        })?;

        let output = pipeline::run_extraction(records, template, model, progress).await;

        self.extraction_records = Some(output.records);
        Ok(output.warnings)
    }

    /// Result table for display or download.
    pub fn export_table(&self) -> Result<Table> {
        let records = self.extraction_records.as_deref().ok_or(StageError::NotReady {
            stage: "export",
            requires: "run the extraction",
        })?;
        Ok(pipeline::export_table(records))
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let table = self.export_table()?;
        pipeline::write_csv_file(&table, path)?;
        Ok(())
    }

    /// Overwrite the source spreadsheet with the result table.
    ///
    /// Skipped when the table did not come from a spreadsheet. A failure
    /// leaves the session and its export untouched.
    pub async fn write_back(&self) -> std::result::Result<WriteBack, WriteBackError> {
        let (Some(store), Some(records)) = (&self.sheet, &self.extraction_records) else {
            info!("No spreadsheet or results to write back, skipping");
            return Ok(WriteBack::Skipped);
        };

        let table = pipeline::export_table(records);
        pipeline::write_back(store.as_ref(), &table).await?;
        Ok(WriteBack::Written { rows: table.len() })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn origin(&self) -> Option<&TableOrigin> {
        self.origin.as_ref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn entities(&self) -> Option<&[String]> {
        self.entities.as_deref()
    }

    pub fn search_records(&self) -> Option<&[SearchRecord]> {
        self.search_records.as_deref()
    }

    pub fn extraction_records(&self) -> Option<&[ExtractionRecord]> {
        self.extraction_records.as_deref()
    }

    /// Whether [`write_back`](Self::write_back) has somewhere to write.
    pub fn can_write_back(&self) -> bool {
        self.sheet.is_some()
    }
}
