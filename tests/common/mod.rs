//! Shared substitute collaborators for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ontogent::agentic::LlmClient;
use ontogent::{OntologySearch, OntologyTerm, SearchQuery};

/// Answers the analysis call, then the ranking call
pub struct StubLlm {
    analysis: Result<String, String>,
    ranking: Result<String, String>,
    pub analysis_calls: AtomicUsize,
    pub ranking_calls: AtomicUsize,
}

impl StubLlm {
    pub fn new(analysis: &str, ranking: &str) -> Self {
        Self {
            analysis: Ok(analysis.to_string()),
            ranking: Ok(ranking.to_string()),
            analysis_calls: AtomicUsize::new(0),
            ranking_calls: AtomicUsize::new(0),
        }
    }

    /// Analysis yields `{}`, so the search uses the user's query
    pub fn ranking(ranking: &str) -> Self {
        Self::new("{}", ranking)
    }

    pub fn failing_analysis() -> Self {
        Self {
            analysis: Err("LLM unavailable".into()),
            ..Self::new("{}", "{}")
        }
    }

    pub fn failing_ranking() -> Self {
        Self {
            ranking: Err("LLM unavailable".into()),
            ..Self::new("{}", "{}")
        }
    }

    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    pub fn ranking_calls(&self) -> usize {
        self.ranking_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn chat(&self, system_prompt: &str, _user_prompt: &str) -> Result<String> {
        let reply = if system_prompt.contains("best_match_id") {
            self.ranking_calls.fetch_add(1, Ordering::SeqCst);
            &self.ranking
        } else {
            self.analysis_calls.fetch_add(1, Ordering::SeqCst);
            &self.analysis
        };
        reply.clone().map_err(|e| anyhow!(e))
    }

    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.chat(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        "stub"
    }

    fn provider_name(&self) -> &str {
        "Stub"
    }
}

/// Returns a fixed candidate list and records every query it receives
pub struct StubSearch {
    terms: Vec<OntologyTerm>,
    fail: bool,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl StubSearch {
    pub fn returning(terms: Vec<OntologyTerm>) -> Self {
        Self {
            terms,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }

    pub fn searched_for(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.query.clone())
            .collect()
    }
}

#[async_trait]
impl OntologySearch for StubSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<OntologyTerm>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.terms.clone())
    }

    fn source_name(&self) -> &str {
        "stub"
    }
}

pub fn term(id: &str, label: &str) -> OntologyTerm {
    OntologyTerm::new(id, label)
}
