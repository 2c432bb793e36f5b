//! OpenAI Client
//!
//! LLM client implementation for the OpenAI chat-completions API.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::llm_client::LlmClient;
use crate::config::{LlmSettings, DEFAULT_MAX_TOKENS, DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI API client
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_OPENAI_MODEL)
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
            base_url: OPENAI_API_BASE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Create from validated settings
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY not configured"))?;
        Ok(Self {
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            ..Self::with_model(api_key, &settings.model)
        })
    }

    /// Point the client at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Internal API call implementation
    async fn call_api(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        json_mode: bool,
    ) -> Result<String> {
        let mut body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        });

        if json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error {}: {}", status, body));
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api_response: ApiResponse = response.json().await?;
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("OpenAI returned no choices"))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.call_api(system_prompt, user_prompt, false).await
    }

    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.call_api(system_prompt, user_prompt, true).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = OpenAiClient::new("test-key".to_string());
        assert_eq!(client.model_name(), DEFAULT_OPENAI_MODEL);
        assert_eq!(client.provider_name(), "OpenAI");
    }

    #[tokio::test]
    async fn test_chat_json_requests_json_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{}"}}]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new("test-key".into()).with_base_url(server.url());
        let text = client.chat_json("system", "hello").await.unwrap();

        assert_eq!(text, "{}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new("test-key".into()).with_base_url(server.url());
        assert!(client.chat("system", "hello").await.is_err());
    }
}
