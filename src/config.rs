//! Runtime configuration
//!
//! Settings are read from environment variables (a `.env` file is loaded by the
//! binaries via dotenvy before this runs). `Settings::from_lookup` takes any
//! key lookup function so tests never have to mutate the process environment.

use std::str::FromStr;
use std::time::Duration;

use crate::agentic::AgentBackend;
use crate::error::ConfigError;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

pub const DEFAULT_OLS_BASE_URL: &str = "https://www.ebi.ac.uk/ols4/api";
pub const DEFAULT_ONTOLOGY: &str = "uberon";
pub const DEFAULT_OLS_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OLS_MAX_RETRIES: u32 = 3;
pub const DEFAULT_OLS_MAX_RESULTS: usize = 10;

/// Language-model client settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub backend: AgentBackend,
    /// `None` only in development mode
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Ontology lookup service settings
#[derive(Debug, Clone, PartialEq)]
pub struct OntologySettings {
    pub base_url: String,
    /// OLS ontology id, e.g. "uberon"
    pub ontology: String,
    /// Identifier prefix kept from search results, e.g. "UBERON"
    pub id_prefix: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub max_results: usize,
}

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLS_BASE_URL.to_string(),
            ontology: DEFAULT_ONTOLOGY.to_string(),
            id_prefix: DEFAULT_ONTOLOGY.to_uppercase(),
            timeout: Duration::from_secs(DEFAULT_OLS_TIMEOUT_SECS),
            max_retries: DEFAULT_OLS_MAX_RETRIES,
            max_results: DEFAULT_OLS_MAX_RESULTS,
        }
    }
}

impl OntologySettings {
    /// Load only the ontology service settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| trimmed(&lookup, key);

        let ontology_id =
            get("ONTOGENT_OLS_ONTOLOGY").unwrap_or_else(|| DEFAULT_ONTOLOGY.to_string());
        Ok(Self {
            base_url: get("ONTOGENT_OLS_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OLS_BASE_URL.to_string()),
            id_prefix: ontology_id.to_uppercase(),
            ontology: ontology_id.to_lowercase(),
            timeout: Duration::from_secs(parse_or(
                get("ONTOGENT_OLS_TIMEOUT_SECS"),
                "ONTOGENT_OLS_TIMEOUT_SECS",
                DEFAULT_OLS_TIMEOUT_SECS,
            )?),
            max_retries: parse_or(
                get("ONTOGENT_OLS_MAX_RETRIES"),
                "ONTOGENT_OLS_MAX_RETRIES",
                DEFAULT_OLS_MAX_RETRIES,
            )?,
            max_results: parse_or(
                get("ONTOGENT_OLS_MAX_RESULTS"),
                "ONTOGENT_OLS_MAX_RESULTS",
                DEFAULT_OLS_MAX_RESULTS,
            )?,
        })
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Run against offline collaborators (built-in catalogue, offline LLM)
    pub dev_mode: bool,
    pub llm: LlmSettings,
    pub ontology: OntologySettings,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| trimmed(&lookup, key);

        let dev_mode = get("ONTOGENT_DEV_MODE")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "t"))
            .unwrap_or(false);

        let backend = match get("AGENT_BACKEND") {
            Some(value) => AgentBackend::from_str(&value)?,
            None => AgentBackend::default(),
        };

        let key_var = backend.api_key_var();
        let api_key = get(key_var);
        if api_key.is_none() && !dev_mode {
            return Err(ConfigError::MissingApiKey { var: key_var });
        }

        let temperature = parse_or(
            get("ONTOGENT_TEMPERATURE"),
            "ONTOGENT_TEMPERATURE",
            DEFAULT_TEMPERATURE,
        )?;
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::TemperatureOutOfRange(temperature));
        }

        let llm = LlmSettings {
            backend,
            api_key,
            model: get(backend.model_var())
                .unwrap_or_else(|| backend.default_model().to_string()),
            max_tokens: parse_or(
                get("ONTOGENT_MAX_TOKENS"),
                "ONTOGENT_MAX_TOKENS",
                DEFAULT_MAX_TOKENS,
            )?,
            temperature,
        };

        let ontology = OntologySettings::from_lookup(&lookup)?;

        Ok(Self {
            dev_mode,
            llm,
            ontology,
        })
    }
}

fn trimmed<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(value: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
            value: raw,
        }),
    }
}
