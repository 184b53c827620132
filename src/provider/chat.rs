use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_prompt, IdeaProvider, ProviderError, ProviderKind};
use crate::config::AppConfig;
use crate::ideas::Category;

/// Key baked in at build time, used when the runtime variable is not set
const BUILD_TIME_API_KEY: Option<&str> = option_env!("DATENIGHT_API_KEY");

/// OpenAI-style `/chat/completions` client (OpenRouter speaks the same dialect)
pub struct ChatCompletionProvider {
    kind: ProviderKind,
    endpoint: String,
    model: String,
    api_key_env: String,
    ideas_per_request: u8,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatCompletionProvider {
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            kind: config.provider,
            endpoint: format!("{}/chat/completions", config.api_base()),
            model: config.model.clone(),
            api_key_env: config.api_key_env().to_string(),
            ideas_per_request: config.ideas_per_request,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        resolve_api_key(std::env::var(&self.api_key_env).ok(), BUILD_TIME_API_KEY)
            .ok_or_else(|| ProviderError::MissingApiKey(self.api_key_env.clone()))
    }
}

/// Runtime value first, then the build-time one. Blank keys count as missing.
fn resolve_api_key(runtime: Option<String>, build_time: Option<&str>) -> Option<String> {
    runtime
        .filter(|key| !key.trim().is_empty())
        .or_else(|| build_time.filter(|key| !key.trim().is_empty()).map(String::from))
}

fn extract_content(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)
}

#[async_trait]
impl IdeaProvider for ChatCompletionProvider {
    async fn suggest(&self, category: Category) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(category, self.ideas_per_request),
            }],
        };

        tracing::info!("Requesting {} ideas from {} ({})", category, self.kind, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let provider = ChatCompletionProvider::new(&AppConfig::default()).unwrap();
        assert_eq!(provider.endpoint(), "https://openrouter.ai/api/v1/chat/completions");

        let config = AppConfig {
            provider: ProviderKind::OpenAi,
            ..AppConfig::default()
        };
        let provider = ChatCompletionProvider::new(&config).unwrap();
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let payload = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(Category::Budget, 3),
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Suggest 3 date ideas for: Budget");
    }

    #[test]
    fn test_extract_first_choice() {
        let body = r#"{
            "id": "gen-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Picnic\nMovie night"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        assert_eq!(extract_content(body).unwrap(), "Picnic\nMovie night");
    }

    #[test]
    fn test_extract_empty_or_invalid() {
        assert!(matches!(
            extract_content(r#"{"choices": []}"#),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            extract_content(r#"{"error": {"message": "rate limited"}}"#),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            extract_content("<html>bad gateway</html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn test_resolve_api_key_order() {
        assert_eq!(
            resolve_api_key(Some("runtime".into()), Some("baked")),
            Some("runtime".to_string())
        );
        assert_eq!(resolve_api_key(None, Some("baked")), Some("baked".to_string()));
        assert_eq!(resolve_api_key(Some("  ".into()), None), None);
        assert_eq!(resolve_api_key(None, Some("")), None);
    }
}
