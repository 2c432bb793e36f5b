//! Error types for ontogent
//!
//! Configuration and ontology-client failures are typed with thiserror.
//! The language-model and ontology collaborator traits return `anyhow::Result`,
//! so these errors travel through the resolution core as `anyhow::Error`.

use thiserror::Error;

/// Problems found while loading [`crate::config::Settings`]
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} is required unless ONTOGENT_DEV_MODE is enabled")]
    MissingApiKey { var: &'static str },

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("ONTOGENT_TEMPERATURE must be between 0.0 and 1.0, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("Unknown AGENT_BACKEND '{0}'. Valid values: anthropic, claude, openai, gpt")]
    UnknownBackend(String),
}

/// Failures talking to the ontology lookup service
#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Ontology API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ontology API returned status {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to decode ontology API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid ontology API URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
