//! Resolution Pipeline
//!
//! Analyze -> Search -> (Empty | Single | Lexical match | Rank) -> Done.
//!
//! Every collaborator failure, and any panic inside one, ends in an empty
//! [`SearchResult`] for the query. `find_term` never fails.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;
use futures::FutureExt;

use super::analyzer::QueryAnalyzer;
use super::matcher::{MatchKind, TermMatcher};
use super::ranker::CandidateRanker;
use crate::agentic::LlmClient;
use crate::ontology::types::DEFAULT_MAX_RESULTS;
use crate::ontology::{OntologySearch, OntologyTerm, SearchQuery, SearchResult};

/// Query equals a candidate label
pub const EXACT_LABEL_CONFIDENCE: f64 = 0.95;
/// Query and label have the same words in any order
pub const TOKEN_SET_CONFIDENCE: f64 = 0.9;
/// One-word query found in exactly one most specific label
pub const SINGLE_WORD_CONFIDENCE: f64 = 0.85;
/// Search returned a single candidate
pub const SINGLE_MATCH_CONFIDENCE: f64 = 0.8;

pub struct ResolutionPipeline {
    analyzer: QueryAnalyzer,
    matcher: TermMatcher,
    ranker: CandidateRanker,
    ontology: Arc<dyn OntologySearch>,
    max_results: usize,
}

impl ResolutionPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, ontology: Arc<dyn OntologySearch>) -> Self {
        tracing::info!(
            llm = llm.provider_name(),
            model = llm.model_name(),
            ontology = ontology.source_name(),
            "Resolution pipeline initialized"
        );
        Self {
            analyzer: QueryAnalyzer::new(llm.clone()),
            matcher: TermMatcher::new(),
            ranker: CandidateRanker::new(llm),
            ontology,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Candidates requested per search
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Resolve a free-text description to the best matching term
    pub async fn find_term(&self, query: &str) -> SearchResult {
        tracing::info!(query, "Finding term");

        match AssertUnwindSafe(self.resolve(query)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::error!(query, error = ?e, "Term resolution failed");
                SearchResult::empty(query)
            }
            Err(panic) => {
                tracing::error!(
                    query,
                    panic = %panic_message(panic.as_ref()),
                    "Term resolution panicked"
                );
                SearchResult::empty(query)
            }
        }
    }

    async fn resolve(&self, query: &str) -> Result<SearchResult> {
        let analysis = self.analyzer.analyze(query, None).await?;
        let search_string = analysis.search_string(query);
        if search_string != query {
            tracing::info!(query, search_string, "Using recommended search query");
        }

        let search = SearchQuery::new(search_string)
            .with_context(query)
            .with_max_results(self.max_results);
        let candidates = self.ontology.search(&search).await?;
        tracing::debug!(query, candidates = candidates.len(), "Search complete");

        match candidates.len() {
            0 => {
                tracing::info!(query, "No candidates found");
                Ok(SearchResult::empty(query))
            }
            1 => {
                let reasoning = format!("Only one matching term found for '{}'.", query);
                Ok(resolved(query, candidates, 0, SINGLE_MATCH_CONFIDENCE, reasoning))
            }
            _ => self.disambiguate(query, candidates).await,
        }
    }

    async fn disambiguate(
        &self,
        query: &str,
        candidates: Vec<OntologyTerm>,
    ) -> Result<SearchResult> {
        if let Some(found) = self.matcher.find_lexical_match(query, &candidates) {
            let (confidence, reasoning) = match found.kind {
                MatchKind::ExactLabel => (
                    EXACT_LABEL_CONFIDENCE,
                    format!(
                        "This term directly matches the anatomical structure '{}'.",
                        query
                    ),
                ),
                MatchKind::TokenSet => (
                    TOKEN_SET_CONFIDENCE,
                    format!(
                        "This term contains all words from the query '{}' in its label.",
                        query
                    ),
                ),
                MatchKind::SingleWord => (
                    SINGLE_WORD_CONFIDENCE,
                    format!(
                        "The term '{}' is the most specific match for the query '{}'.",
                        found.term.label, query
                    ),
                ),
            };
            tracing::info!(
                query,
                term_id = %found.term.id,
                kind = ?found.kind,
                "Lexical match"
            );
            let index = candidates
                .iter()
                .position(|t| std::ptr::eq(t, found.term))
                .unwrap_or(candidates.len());
            return Ok(resolved(query, candidates, index, confidence, reasoning));
        }

        let Some(outcome) = self.ranker.rank(query, &candidates).await? else {
            tracing::info!(query, candidates = candidates.len(), "No confident best match");
            return Ok(SearchResult::unresolved(query, candidates));
        };

        let index = candidates
            .iter()
            .position(|t| t.id == outcome.best_match_id)
            .unwrap_or(candidates.len());
        Ok(resolved(
            query,
            candidates,
            index,
            outcome.confidence,
            outcome.reasoning,
        ))
    }
}

/// Result selecting `candidates[index]`; unresolved when `index` is out of range
fn resolved(
    query: &str,
    candidates: Vec<OntologyTerm>,
    index: usize,
    confidence: f64,
    reasoning: String,
) -> SearchResult {
    if index >= candidates.len() {
        return SearchResult::unresolved(query, candidates);
    }
    SearchResult::resolved(query, candidates, index, confidence, reasoning)
        .unwrap_or_else(|| SearchResult::empty(query))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
