//! Row-oriented table with named columns.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::SourceError;

/// A rectangular table of text cells.
///
/// Every row has exactly `headers.len()` cells; short input rows are padded
/// with empty cells, wider rows are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, SourceError> {
        if headers.is_empty() {
            return Err(SourceError::MissingHeader);
        }

        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(SourceError::DuplicateColumn(header.clone()));
            }
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                if row.len() > width {
                    return Err(SourceError::RaggedRow {
                        row: i + 1,
                        found: row.len(),
                        expected: width,
                    });
                }
                row.resize(width, String::new());
                Ok(row)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, rows })
    }

    /// First row is the header, the rest are data rows.
    pub fn from_rows(mut values: Vec<Vec<String>>) -> Result<Self, SourceError> {
        if values.is_empty() {
            return Err(SourceError::MissingHeader);
        }
        let headers = values.remove(0);
        Self::new(headers, values)
    }

    /// Parse delimited text whose first record is the header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(SourceError::MissingHeader);
        }

        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Self::new(headers, rows)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| SourceError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Same columns, first `n` rows only.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Header followed by every data row, as sent to a spreadsheet.
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.headers.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        // csv only ever writes the UTF-8 it was given
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
