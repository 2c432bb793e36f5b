//! Language-model collaborators
//!
//! ## Backend Selection
//!
//! Set `AGENT_BACKEND` environment variable:
//! - `anthropic` (default): Anthropic Claude API
//! - `openai`: OpenAI API
//!
//! `ONTOGENT_DEV_MODE=true` swaps either for [`OfflineLlmClient`].

pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod llm_client;
pub mod offline_client;
pub mod openai_client;

pub use anthropic_client::AnthropicClient;
pub use backend::AgentBackend;
pub use client_factory::create_llm_client;
pub use llm_client::LlmClient;
pub use offline_client::OfflineLlmClient;
pub use openai_client::OpenAiClient;
