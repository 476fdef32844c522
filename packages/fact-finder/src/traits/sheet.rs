//! Remote spreadsheet access.

use async_trait::async_trait;
use sheets_client::{spreadsheet_id_from_url, SheetsClient, SheetsError, ValueInputOption};
use std::path::Path;

use crate::error::{SourceError, WriteBackError};

/// The named range that is always read and overwritten in full.
pub const DEFAULT_RANGE: &str = "Sheet1";

/// An authenticated handle on one spreadsheet.
#[async_trait]
pub trait SheetStore: Send + Sync {
    fn spreadsheet_id(&self) -> &str;

    /// Every populated row of `range`, header first.
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SourceError>;

    /// Replace `range` with `rows`, header first.
    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), WriteBackError>;
}

/// Google Sheets backed store using a service-account key.
pub struct GoogleSheet {
    client: SheetsClient,
    spreadsheet_id: String,
}

impl GoogleSheet {
    /// Resolve the locator, load the key and authenticate.
    pub async fn connect(credentials_path: &Path, locator: &str) -> Result<Self, SourceError> {
        let spreadsheet_id = spreadsheet_id_from_url(locator)
            .map_err(|_| SourceError::InvalidLocator(locator.to_string()))?;

        let client = SheetsClient::from_service_account_file(credentials_path)
            .map_err(|e| SourceError::Auth(Box::new(e)))?;

        Self::authenticated(client, spreadsheet_id).await
    }

    /// Authenticate an already-configured client.
    pub async fn authenticated(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
    ) -> Result<Self, SourceError> {
        client
            .authenticate()
            .await
            .map_err(|e| SourceError::Auth(Box::new(e)))?;

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
        })
    }
}

#[async_trait]
impl SheetStore for GoogleSheet {
    fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SourceError> {
        self.client
            .get_values(&self.spreadsheet_id, range)
            .await
            .map(|r| r.values)
            .map_err(|e| match e {
                SheetsError::TokenExchange { .. } | SheetsError::InvalidKey(_) => {
                    SourceError::Auth(Box::new(e))
                }
                other => SourceError::Fetch {
                    range: range.to_string(),
                    source: Box::new(other),
                },
            })
    }

    async fn write_range(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), WriteBackError> {
        self.client
            .update_values(&self.spreadsheet_id, range, rows, ValueInputOption::Raw)
            .await
            .map(|_| ())
            .map_err(|e| WriteBackError::Request {
                range: range.to_string(),
                source: Box::new(e),
            })
    }
}
