use thiserror::Error;

pub type Result<T> = std::result::Result<T, SerpApiError>;

#[derive(Debug, Error)]
pub enum SerpApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SerpAPI error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Missing API key")]
    MissingApiKey,
}
