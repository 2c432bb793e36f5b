//! Language-model provider chosen by `AGENT_BACKEND`

use std::fmt;
use std::str::FromStr;

use crate::config::{DEFAULT_ANTHROPIC_MODEL, DEFAULT_OPENAI_MODEL};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentBackend {
    #[default]
    Anthropic,
    OpenAi,
}

impl AgentBackend {
    /// Variable holding the provider's API key
    pub fn api_key_var(self) -> &'static str {
        match self {
            AgentBackend::Anthropic => "ANTHROPIC_API_KEY",
            AgentBackend::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Variable overriding the model id
    pub fn model_var(self) -> &'static str {
        match self {
            AgentBackend::Anthropic => "ANTHROPIC_MODEL",
            AgentBackend::OpenAi => "OPENAI_MODEL",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            AgentBackend::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            AgentBackend::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Accepts provider or model-family names, ignoring case
impl FromStr for AgentBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "anthropic" | "claude" => Ok(AgentBackend::Anthropic),
            "openai" | "gpt" => Ok(AgentBackend::OpenAi),
            _ => Err(ConfigError::UnknownBackend(value)),
        }
    }
}

impl fmt::Display for AgentBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgentBackend::Anthropic => "Anthropic",
            AgentBackend::OpenAi => "OpenAI",
        })
    }
}
