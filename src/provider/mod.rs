pub mod chat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ideas::Category;

pub use chat::ChatCompletionProvider;

/// Hosted chat-completion services the app can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openrouter")]
    OpenRouter,
    #[value(name = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn default_api_base(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenRouter => f.write_str("OpenRouter"),
            ProviderKind::OpenAi => f.write_str("OpenAI"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No API key: set {0}")]
    MissingApiKey(String),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response format: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No content in response")]
    EmptyResponse,
}

/// Something that turns a category into raw suggestion text
#[async_trait]
pub trait IdeaProvider: Send + Sync {
    async fn suggest(&self, category: Category) -> Result<String, ProviderError>;
}

pub fn build_prompt(category: Category, count: u8) -> String {
    format!("Suggest {} date ideas for: {}", count.max(1), category.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_interpolates_category() {
        assert_eq!(
            build_prompt(Category::Outdoor, 3),
            "Suggest 3 date ideas for: Outdoor"
        );
        assert_eq!(build_prompt(Category::All, 0), "Suggest 1 date ideas for: All");
    }

    #[test]
    fn test_provider_kind_names() {
        let kind: ProviderKind = serde_json::from_str("\"openrouter\"").unwrap();
        assert_eq!(kind, ProviderKind::OpenRouter);
        assert_eq!(serde_json::to_string(&ProviderKind::OpenAi).unwrap(), "\"openai\"");
        assert_eq!(ProviderKind::OpenAi.default_api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_error_messages() {
        let err = ProviderError::MissingApiKey("OPENROUTER_API_KEY".into());
        assert_eq!(err.to_string(), "No API key: set OPENROUTER_API_KEY");

        let err = ProviderError::Status { status: 401, body: "unauthorized".into() };
        assert_eq!(err.to_string(), "API returned 401: unauthorized");
    }
}
