use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetsError>;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("failed to read credentials file {path}: {source}")]
    CredentialsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token exchange failed ({status}): {message}")]
    TokenExchange { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("not a spreadsheet URL: {0}")]
    InvalidUrl(String),
}
