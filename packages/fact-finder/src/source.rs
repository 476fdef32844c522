//! Where the input table comes from.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SourceError;
use crate::traits::sheet::{GoogleSheet, SheetStore, DEFAULT_RANGE};
use crate::types::table::Table;

/// Rows shown to the user after a table is loaded.
pub const PREVIEW_ROWS: usize = 5;

/// A user's choice of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Local delimited file with a header line
    Upload(PathBuf),
    /// Spreadsheet share URL
    Sheet(String),
}

/// Where the session's current table was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrigin {
    Upload { path: PathBuf },
    Sheet { locator: String, spreadsheet_id: String },
}

impl TableOrigin {
    /// The spreadsheet locator, when the table came from one.
    pub fn locator(&self) -> Option<&str> {
        match self {
            Self::Sheet { locator, .. } => Some(locator),
            Self::Upload { .. } => None,
        }
    }
}

impl fmt::Display for TableOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload { path } => write!(f, "{}", path.display()),
            Self::Sheet { spreadsheet_id, .. } => write!(f, "spreadsheet {spreadsheet_id}"),
        }
    }
}

/// A loaded table plus the handle needed to write results back, if any.
pub struct LoadedTable {
    pub table: Table,
    pub origin: TableOrigin,
    pub store: Option<Box<dyn SheetStore>>,
}

impl TableSource {
    /// Read the table. Spreadsheets authenticate with the service-account
    /// key at `credentials_path`; uploads ignore it.
    pub async fn load(&self, credentials_path: &Path) -> Result<LoadedTable, SourceError> {
        match self {
            Self::Upload(path) => Ok(LoadedTable {
                table: load_csv(path)?,
                origin: TableOrigin::Upload { path: path.clone() },
                store: None,
            }),
            Self::Sheet(locator) => {
                let store = GoogleSheet::connect(credentials_path, locator).await?;
                let table = fetch_sheet_table(&store).await?;
                Ok(LoadedTable {
                    table,
                    origin: TableOrigin::Sheet {
                        locator: locator.clone(),
                        spreadsheet_id: store.spreadsheet_id().to_string(),
                    },
                    store: Some(Box::new(store)),
                })
            }
        }
    }
}

pub fn load_csv(path: &Path) -> Result<Table, SourceError> {
    let table = Table::from_csv_path(path)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded table from file"
    );
    Ok(table)
}

/// Fetch the default range; first row is the header.
pub async fn fetch_sheet_table(store: &dyn SheetStore) -> Result<Table, SourceError> {
    let values = store.read_range(DEFAULT_RANGE).await?;
    if values.is_empty() {
        return Err(SourceError::EmptyRange {
            range: DEFAULT_RANGE.to_string(),
        });
    }

    let table = Table::from_rows(values)?;
    info!(
        spreadsheet_id = store.spreadsheet_id(),
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded table from spreadsheet"
    );
    Ok(table)
}

/// The first [`PREVIEW_ROWS`] rows of `table`.
pub fn preview(table: &Table) -> Table {
    table.head(PREVIEW_ROWS)
}
