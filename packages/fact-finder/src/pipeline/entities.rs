//! Entity selection from a loaded table.

use crate::error::ColumnError;
use crate::types::table::Table;

/// Non-empty values of `column`, in table order.
///
/// Cells that are empty or whitespace-only are dropped; kept values are
/// returned verbatim. Duplicates are kept.
pub fn extract_entities(table: &Table, column: &str) -> Result<Vec<String>, ColumnError> {
    let cells = table
        .column(column)
        .ok_or_else(|| ColumnError::UnknownColumn {
            column: column.to_string(),
            available: table.headers().to_vec(),
        })?;

    Ok(cells
        .filter(|cell| !cell.trim().is_empty())
        .map(str::to_string)
        .collect())
}
