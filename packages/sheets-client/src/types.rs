use serde::{Deserialize, Serialize};

/// A block of cell values addressed by an A1 range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Omitted by the API when the range holds no data.
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

impl ValueRange {
    pub fn rows(values: Vec<Vec<String>>) -> Self {
        Self {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values,
        }
    }
}

/// How the API should interpret written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Stored exactly as given.
    Raw,
    /// Parsed as if typed into the UI (formulas, dates).
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
    #[serde(default)]
    pub updated_columns: Option<u32>,
    #[serde(default)]
    pub updated_cells: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_range_has_no_values() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range":"Sheet1!A1:Z1000","majorDimension":"ROWS"}"#).unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn test_rows_serializes_camel_case() {
        let body = serde_json::to_value(ValueRange::rows(vec![vec!["a".into()]])).unwrap();
        assert_eq!(body["majorDimension"], "ROWS");
        assert!(body.get("range").is_none());
    }
}
