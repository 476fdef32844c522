//! Pure Google Sheets v4 REST client.
//!
//! Reads and overwrites value ranges using a service-account key.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheets_client::{spreadsheet_id_from_url, SheetsClient, ValueInputOption};
//!
//! let client = SheetsClient::from_service_account_file("credentials.json")?;
//! let id = spreadsheet_id_from_url("https://docs.google.com/spreadsheets/d/abc123/edit")?;
//!
//! let range = client.get_values(&id, "Sheet1").await?;
//! client.update_values(&id, "Sheet1", range.values, ValueInputOption::Raw).await?;
//! ```

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, DRIVE_SCOPE, SPREADSHEETS_SCOPE};
pub use error::{Result, SheetsError};
pub use types::{UpdateValuesResponse, ValueInputOption, ValueRange};

use std::path::Path;
use types::ErrorBody;

const BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Pull the spreadsheet id out of a share URL.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0` splits on `/`
/// into `["https:", "", host, "spreadsheets", "d", "<id>", ...]`; the id is
/// the segment at index 5.
pub fn spreadsheet_id_from_url(url: &str) -> Result<String> {
    url.trim()
        .split('/')
        .nth(5)
        .map(|segment| segment.split(['?', '#']).next().unwrap_or_default())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SheetsError::InvalidUrl(url.to_string()))
}

pub struct SheetsClient {
    client: reqwest::Client,
    auth: ServiceAccountAuth,
    base_url: String,
}

impl SheetsClient {
    /// Client with spreadsheet and drive scopes for the given key.
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth: ServiceAccountAuth::new(key, &[SPREADSHEETS_SCOPE, DRIVE_SCOPE]),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_service_account_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(ServiceAccountKey::from_file(path)?))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Exchange credentials up front so bad keys surface before any read.
    pub async fn authenticate(&self) -> Result<()> {
        self.auth.access_token().await?;
        tracing::info!(client_email = %self.auth.client_email(), "Authenticated to Google Sheets");
        Ok(())
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    /// Read every populated row of `range`.
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange> {
        let token = self.auth.access_token().await?;
        let resp = self
            .client
            .get(self.values_url(spreadsheet_id, range))
            .bearer_auth(token)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let values: ValueRange = resp.json().await?;
        tracing::debug!(spreadsheet_id, range, rows = values.values.len(), "Fetched sheet values");
        Ok(values)
    }

    /// Overwrite `range` starting at its top-left cell with `values`.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
        input: ValueInputOption,
    ) -> Result<UpdateValuesResponse> {
        let token = self.auth.access_token().await?;
        let resp = self
            .client
            .put(self.values_url(spreadsheet_id, range))
            .query(&[("valueInputOption", input.as_str())])
            .bearer_auth(token)
            .json(&ValueRange::rows(values))
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let updated: UpdateValuesResponse = resp.json().await?;
        tracing::info!(
            spreadsheet_id,
            updated_range = ?updated.updated_range,
            updated_cells = ?updated.updated_cells,
            "Updated sheet values"
        );
        Ok(updated)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    tracing::warn!(status = %status, error = %message, "Sheets API error");
    Err(SheetsError::Api {
        status: status.as_u16(),
        message,
    })
}
