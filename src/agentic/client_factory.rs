//! Client Factory
//!
//! Builds the configured LLM client behind an `Arc<dyn LlmClient>`.

use std::sync::Arc;

use anyhow::Result;

use super::anthropic_client::AnthropicClient;
use super::backend::AgentBackend;
use super::llm_client::LlmClient;
use super::offline_client::OfflineLlmClient;
use super::openai_client::OpenAiClient;
use crate::config::Settings;

/// Create the LLM client selected by the settings
///
/// Development mode always yields the offline client, whatever backend is set.
pub fn create_llm_client(settings: &Settings) -> Result<Arc<dyn LlmClient>> {
    if settings.dev_mode {
        tracing::info!("Development mode: using offline LLM client");
        return Ok(Arc::new(OfflineLlmClient));
    }

    let client: Arc<dyn LlmClient> = match settings.llm.backend {
        AgentBackend::Anthropic => Arc::new(AnthropicClient::from_settings(&settings.llm)?),
        AgentBackend::OpenAi => Arc::new(OpenAiClient::from_settings(&settings.llm)?),
    };

    tracing::info!(
        provider = client.provider_name(),
        model = client.model_name(),
        "LLM client initialized"
    );
    Ok(client)
}
