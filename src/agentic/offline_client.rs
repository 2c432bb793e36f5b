//! Offline Client
//!
//! Stand-in LLM used in development mode. It never touches the network and
//! always answers with an empty JSON object, so query analysis falls back to
//! the user's own wording and candidate ranking declines to pick a winner.

use anyhow::Result;
use async_trait::async_trait;

use super::llm_client::LlmClient;

const OFFLINE_RESPONSE: &str = "{}";

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLlmClient;

#[async_trait]
impl LlmClient for OfflineLlmClient {
    async fn chat(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
        tracing::debug!(prompt_len = user_prompt.len(), "Offline LLM answering");
        Ok(OFFLINE_RESPONSE.to_string())
    }

    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.chat(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        "offline"
    }

    fn provider_name(&self) -> &str {
        "Offline"
    }
}
