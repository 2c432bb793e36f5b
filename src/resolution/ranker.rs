//! Candidate Ranker
//!
//! Asks the language model to pick the best of several candidate terms.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;

use super::json::parse_object;
use crate::agentic::LlmClient;
use crate::ontology::OntologyTerm;

const RANKING_SYSTEM_PROMPT: &str = r#"You are an expert in anatomy and the UBERON ontology. Your task is to identify the most suitable
UBERON term for the user's description of an anatomical structure.

You will be given:
1. The user's original query
2. A list of potential UBERON terms with their IDs, labels, and definitions

Analyze which term best matches the user's description. Consider factors like:
- Exact term matches
- Semantic similarity
- Specificity (more specific terms are better than general ones if appropriate)
- Context from the user query (species, developmental stage, etc.)

Respond with a single JSON object with the following fields:
- best_match_id: The ID of the best matching UBERON term
- confidence: A number between 0 and 1 indicating your confidence
- reasoning: A brief explanation of why you chose this term"#;

/// The model's choice among the candidates
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankingOutcome {
    pub best_match_id: String,
    /// In [0.0, 1.0]
    pub confidence: f64,
    pub reasoning: String,
}

pub struct CandidateRanker {
    llm: Arc<dyn LlmClient>,
}

impl CandidateRanker {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Rank `terms` against `query`
    ///
    /// `Ok(None)` when there is nothing to rank or the reply is unusable:
    /// not a JSON object, a required key missing, confidence outside
    /// [0, 1], or an id that is not one of `terms`. Language model errors
    /// propagate.
    pub async fn rank(
        &self,
        query: &str,
        terms: &[OntologyTerm],
    ) -> Result<Option<RankingOutcome>> {
        if terms.is_empty() {
            return Ok(None);
        }

        tracing::debug!(query, candidates = terms.len(), "Ranking candidates");
        let reply = self
            .llm
            .chat_json(RANKING_SYSTEM_PROMPT, &ranking_prompt(query, terms))
            .await?;

        let Some(outcome) = parse_object::<RankingOutcome>(&reply) else {
            tracing::warn!(query, "Ranking reply is not a usable JSON object");
            return Ok(None);
        };

        if !(0.0..=1.0).contains(&outcome.confidence) {
            tracing::warn!(
                query,
                confidence = outcome.confidence,
                "Ranking confidence out of range"
            );
            return Ok(None);
        }

        if !terms.iter().any(|t| t.id == outcome.best_match_id) {
            tracing::warn!(
                query,
                term_id = %outcome.best_match_id,
                "Ranking chose a term that is not a candidate"
            );
            return Ok(None);
        }

        tracing::info!(
            query,
            term_id = %outcome.best_match_id,
            confidence = outcome.confidence,
            "Ranking selected best match"
        );
        Ok(Some(outcome))
    }
}

fn ranking_prompt(query: &str, terms: &[OntologyTerm]) -> String {
    let candidates = terms
        .iter()
        .map(|t| {
            let definition = if t.definition.trim().is_empty() {
                "N/A"
            } else {
                t.definition.as_str()
            };
            format!("ID: {}\nLabel: {}\nDefinition: {}", t.id, t.label, definition)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "User query: {}\n\nPotential UBERON terms:\n{}\n\n\
         Please identify the best matching term based on the user's query.",
        query, candidates
    )
}
