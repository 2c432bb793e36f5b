//! Query resolution
//!
//! Turns a free-text anatomical description into a ranked, explained best
//! match. [`ResolutionPipeline`] owns the flow; the analyzer and ranker talk
//! to the language model, the matcher never does.

pub mod analyzer;
pub mod json;
pub mod matcher;
pub mod pipeline;
pub mod ranker;

#[cfg(test)]
pub(crate) mod test_support;

pub use analyzer::{AnalysisFields, QueryAnalysis, QueryAnalyzer};
pub use matcher::{LexicalMatch, MatchKind, TermMatcher};
pub use pipeline::{
    ResolutionPipeline, EXACT_LABEL_CONFIDENCE, SINGLE_MATCH_CONFIDENCE, SINGLE_WORD_CONFIDENCE,
    TOKEN_SET_CONFIDENCE,
};
pub use ranker::{CandidateRanker, RankingOutcome};
