//! Ontology value types
//!
//! `OntologyTerm` and `SearchQuery` are plain values. `SearchResult` keeps its
//! fields private so the constructors can uphold its invariants:
//! `total_matches == matches.len()`, `best_match` is one of `matches`, and
//! `confidence` is 0.0 whenever there is no best match.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A term from the anatomy ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    /// Namespaced identifier, e.g. `UBERON:0000948`
    pub id: String,
    pub label: String,
    /// May be empty
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub parent_ids: BTreeSet<String>,
    /// Canonical URL, may be empty
    #[serde(default)]
    pub url: String,
}

impl OntologyTerm {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            definition: String::new(),
            synonyms: Vec::new(),
            parent_ids: BTreeSet::new(),
            url: String::new(),
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_ids = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl fmt::Display for OntologyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.label)
    }
}

/// A search request sent to the ontology collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: usize,
    pub include_definitions: bool,
    pub include_synonyms: bool,
    /// The user's original wording when `query` was rewritten by analysis
    pub context: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
            include_definitions: true,
            include_synonyms: true,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Final output of a resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    query: String,
    matches: Vec<OntologyTerm>,
    total_matches: usize,
    best_match: Option<OntologyTerm>,
    confidence: f64,
    reasoning: String,
}

impl SearchResult {
    /// No candidates at all
    pub fn empty(query: impl Into<String>) -> Self {
        Self::unresolved(query, Vec::new())
    }

    /// Candidates found but none selected
    pub fn unresolved(query: impl Into<String>, matches: Vec<OntologyTerm>) -> Self {
        Self {
            query: query.into(),
            total_matches: matches.len(),
            matches,
            best_match: None,
            confidence: 0.0,
            reasoning: String::new(),
        }
    }

    /// Candidates found and `matches[best_index]` selected
    ///
    /// Returns `None` when `best_index` is out of range. Confidence is clamped
    /// to [0.0, 1.0].
    pub fn resolved(
        query: impl Into<String>,
        matches: Vec<OntologyTerm>,
        best_index: usize,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Option<Self> {
        let best = matches.get(best_index)?.clone();
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some(Self {
            query: query.into(),
            total_matches: matches.len(),
            matches,
            best_match: Some(best),
            confidence,
            reasoning: reasoning.into(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[OntologyTerm] {
        &self.matches
    }

    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub fn best_match(&self) -> Option<&OntologyTerm> {
        self.best_match.as_ref()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.best_match {
            Some(best) => write!(
                f,
                "Best match: {}\nConfidence: {:.2}\nReasoning: {}",
                best, self.confidence, self.reasoning
            ),
            None => write!(f, "No matches found for query: {}", self.query),
        }
    }
}
