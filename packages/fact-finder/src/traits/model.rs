//! Language-model completion trait.

use async_trait::async_trait;
use openai_client::{ChatRequest, OpenAIClient};

use crate::error::{ModelError, StageError};
use crate::security::{require_secret, SecretString, Service};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Complete a prompt and return the trimmed text.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// OpenAI chat-completions backed model with fixed sampling settings.
pub struct OpenAICompletion {
    client: OpenAIClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAICompletion {
    /// Rejects an absent or blank key before any request is made.
    pub fn new(api_key: Option<&SecretString>, model: impl Into<String>) -> Result<Self, StageError> {
        let key = require_secret(api_key, Service::OpenAI)?;
        Ok(Self::with_client(OpenAIClient::new(key), model))
    }

    pub fn with_client(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest::prompt(&self.model, prompt)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
    }
}

#[async_trait]
impl CompletionModel for OpenAICompletion {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let response = self
            .client
            .chat_completion(self.request(prompt))
            .await
            .map_err(|e| ModelError::Request(Box::new(e)))?;

        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::secret_from;

    #[test]
    fn test_request_uses_fixed_sampling() {
        let model = OpenAICompletion::new(secret_from("sk-test").as_ref(), "gpt-4o-mini").unwrap();
        let request = model.request("Find it");

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, Some(200));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "Find it");
    }

    #[test]
    fn test_blank_key_rejects_stage() {
        let blank = SecretString::from("  ".to_string());
        assert!(matches!(
            OpenAICompletion::new(Some(&blank), DEFAULT_MODEL),
            Err(StageError::MissingCredential {
                service: Service::OpenAI
            })
        ));
    }
}
