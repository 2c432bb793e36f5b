//! Query Analyzer
//!
//! Asks the language model to pull anatomical concepts out of a free-text
//! query and to suggest a search string for the ontology service.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::json::parse_object;
use crate::agentic::LlmClient;

const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert in anatomy and the UBERON ontology. Your task is to analyze the user's query about
an anatomical structure and identify the most relevant UBERON terms that might match their description.

Focus on extracting:
1. Key anatomical concepts from the query
2. Species information if mentioned
3. Developmental stage if mentioned
4. Any modifiers or qualifiers that might narrow down the search

Respond with a single JSON object with the following fields:
- extracted_concepts: List of key anatomical concepts
- possible_uberon_terms: List of potential UBERON terms that might match
- recommended_search_query: A suggested search query to find the UBERON term
- explanation: Brief explanation of your reasoning"#;

/// Structured fields of a successful analysis
///
/// Fields are read leniently: a value of an unexpected type is dropped
/// rather than failing the whole analysis.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisFields {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub extracted_concepts: Vec<String>,
    #[serde(
        default,
        rename = "possible_uberon_terms",
        deserialize_with = "lenient_strings"
    )]
    pub possible_terms: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommended_search_query: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub explanation: Option<String>,
}

/// A string list; objects contribute their `label` or `name`, other items are skipped
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        single @ Value::String(_) => vec![single],
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Object(map) => ["label", "name"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string),
            _ => None,
        })
        .collect())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Outcome of analysing a query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAnalysis {
    Parsed(AnalysisFields),
    /// The model reply was not a usable JSON object. `raw_response` holds
    /// the user's original query, not the model text.
    Unparsed { raw_response: String },
}

impl QueryAnalysis {
    /// The string to send to the ontology search
    ///
    /// The recommended search query when the model gave a non-blank one,
    /// otherwise `query`.
    pub fn search_string<'a>(&'a self, query: &'a str) -> &'a str {
        match self {
            QueryAnalysis::Parsed(AnalysisFields {
                recommended_search_query: Some(recommended),
                ..
            }) if !recommended.trim().is_empty() => recommended.trim(),
            _ => query,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, QueryAnalysis::Parsed(_))
    }
}

pub struct QueryAnalyzer {
    llm: Arc<dyn LlmClient>,
}

impl QueryAnalyzer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Analyse `query`, optionally with extra context for the model
    ///
    /// Errors from the language model propagate. Unusable replies do not:
    /// they become [`QueryAnalysis::Unparsed`].
    pub async fn analyze(&self, query: &str, context: Option<&str>) -> Result<QueryAnalysis> {
        let mut prompt = format!(
            "Please analyze this query about an anatomical structure: {}",
            query
        );
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!("\n\nAdditional context: {}", context));
        }

        let reply = self.llm.chat_json(ANALYSIS_SYSTEM_PROMPT, &prompt).await?;

        match parse_object::<AnalysisFields>(&reply) {
            Some(fields) => {
                tracing::debug!(
                    concepts = ?fields.extracted_concepts,
                    recommended = ?fields.recommended_search_query,
                    "Query analysis parsed"
                );
                Ok(QueryAnalysis::Parsed(fields))
            }
            None => {
                tracing::warn!(query, "Could not parse query analysis, using original query");
                Ok(QueryAnalysis::Unparsed {
                    raw_response: query.to_string(),
                })
            }
        }
    }
}
