//! Ontology Search Trait
//!
//! The interface the resolution core needs from an ontology lookup service.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{OntologyTerm, SearchQuery};

/// Search collaborator
///
/// Returns candidates ordered by the service's own relevance scoring; callers
/// do not re-sort. Retries and backoff, if any, belong to the implementation.
#[async_trait]
pub trait OntologySearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<OntologyTerm>>;

    /// Short name for logging
    fn source_name(&self) -> &str;
}
