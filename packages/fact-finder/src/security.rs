//! Credential handling.
//!
//! Keys live in `secrecy::SecretString` for the whole session so they never
//! reach `Debug` output or logs; they are exposed only when a client is built.

use std::fmt;

pub use secrecy::{ExposeSecret, SecretString};

use crate::error::StageError;

/// External service a credential authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    SerpApi,
    OpenAI,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SerpApi => "SerpAPI",
            Self::OpenAI => "OpenAI",
        })
    }
}

/// Wrap a raw value, treating blank input as "no credential".
pub fn secret_from(value: impl Into<String>) -> Option<SecretString> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(SecretString::from(value.trim().to_string()))
    }
}

/// Expose a credential for client construction, or reject the stage.
pub fn require_secret(
    secret: Option<&SecretString>,
    service: Service,
) -> Result<&str, StageError> {
    secret
        .map(|s| s.expose_secret())
        .filter(|s| !s.trim().is_empty())
        .ok_or(StageError::MissingCredential { service })
}
