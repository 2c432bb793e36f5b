//! Term Matcher
//!
//! Deterministic lexical matching between a query and candidate labels.
//! Rules are tried in order and the first hit wins:
//!
//! 1. the trimmed query equals a label, ignoring case
//! 2. the query's lowercase word set equals a label's word set
//! 3. a one-word query is a whole word of some labels; the label with the
//!    fewest words (then fewest characters) wins, and a tie means no match
//!
//! Multi-word queries never match on rule 3, so "embryonic heart" is left for
//! the ranker rather than resolving to plain "heart".

use std::collections::BTreeSet;

use crate::ontology::OntologyTerm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    ExactLabel,
    TokenSet,
    SingleWord,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalMatch<'a> {
    pub term: &'a OntologyTerm,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TermMatcher;

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

impl TermMatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn find_exact_match<'a>(
        &self,
        query: &str,
        terms: &'a [OntologyTerm],
    ) -> Option<&'a OntologyTerm> {
        self.find_lexical_match(query, terms).map(|m| m.term)
    }

    /// Like [`Self::find_exact_match`], also reporting which rule matched
    pub fn find_lexical_match<'a>(
        &self,
        query: &str,
        terms: &'a [OntologyTerm],
    ) -> Option<LexicalMatch<'a>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let found = |term: &'a OntologyTerm, kind| Some(LexicalMatch { term, kind });

        let lowered = query.to_lowercase();
        if let Some(term) = terms
            .iter()
            .find(|t| t.label.trim().to_lowercase() == lowered)
        {
            return found(term, MatchKind::ExactLabel);
        }

        let query_words = words(query);
        let query_set: BTreeSet<&str> = query_words.iter().map(String::as_str).collect();
        if let Some(term) = terms.iter().find(|t| {
            let label_words = words(&t.label);
            label_words.iter().map(String::as_str).collect::<BTreeSet<_>>() == query_set
        }) {
            return found(term, MatchKind::TokenSet);
        }

        let [word] = query_words.as_slice() else {
            return None;
        };
        let specificity = |t: &OntologyTerm| (t.label.split_whitespace().count(), t.label.len());
        let mut hits: Vec<&OntologyTerm> = terms
            .iter()
            .filter(|t| words(&t.label).contains(word))
            .collect();
        hits.sort_by_key(|t| specificity(*t));

        match hits.as_slice() {
            [] => None,
            [best] => found(*best, MatchKind::SingleWord),
            [best, runner_up, ..] if specificity(*best) < specificity(*runner_up) => {
                found(*best, MatchKind::SingleWord)
            }
            _ => {
                tracing::debug!(query, hits = hits.len(), "Ambiguous single-word match");
                None
            }
        }
    }
}
