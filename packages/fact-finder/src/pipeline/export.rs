//! Result table, CSV artifact and sheet write-back.

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{ExportError, SourceError, WriteBackError};
use crate::traits::sheet::{SheetStore, DEFAULT_RANGE};
use crate::types::records::ExtractionRecord;
use crate::types::table::Table;

pub const ENTITY_COLUMN: &str = "entity";
pub const EXTRACTED_INFO_COLUMN: &str = "extracted_info";

/// Default file name of the downloadable artifact.
pub const DEFAULT_EXPORT_FILE: &str = "extracted_data.csv";

/// Two-column table `entity,extracted_info`, one row per record, in order.
pub fn export_table(records: &[ExtractionRecord]) -> Table {
    let headers = vec![ENTITY_COLUMN.to_string(), EXTRACTED_INFO_COLUMN.to_string()];
    let rows = records
        .iter()
        .map(|r| vec![r.entity.clone(), r.extracted_info.clone()])
        .collect();

    // Fixed, distinct two-column header and two-cell rows cannot be rejected.
    Table::new(headers, rows).unwrap_or_default()
}

/// Write the table as comma-delimited UTF-8 with a header line.
pub fn write_csv_file(table: &Table, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    table.write_csv(std::io::BufWriter::new(file))?;

    info!(path = %path.display(), rows = table.len(), "Exported results");
    Ok(())
}

/// Read an exported artifact back into records.
pub fn parse_export<R: Read>(reader: R) -> Result<Vec<ExtractionRecord>, SourceError> {
    let table = Table::from_csv_reader(reader)?;
    records_from_table(&table)
}

pub fn records_from_table(table: &Table) -> Result<Vec<ExtractionRecord>, SourceError> {
    let (Some(entity), Some(info)) = (
        table.column_index(ENTITY_COLUMN),
        table.column_index(EXTRACTED_INFO_COLUMN),
    ) else {
        return Err(SourceError::MissingHeader);
    };

    Ok(table
        .rows()
        .iter()
        .map(|row| ExtractionRecord::new(row[entity].as_str(), row[info].as_str()))
        .collect())
}

/// Overwrite the store's default range with the result table, header first.
pub async fn write_back(store: &dyn SheetStore, table: &Table) -> Result<(), WriteBackError> {
    store.write_range(DEFAULT_RANGE, table.to_values()).await?;

    info!(
        spreadsheet_id = store.spreadsheet_id(),
        range = DEFAULT_RANGE,
        rows = table.len(),
        "Wrote results back to sheet"
    );
    Ok(())
}
