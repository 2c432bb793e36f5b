//! Substitute collaborators for unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::agentic::LlmClient;
use crate::ontology::{OntologySearch, OntologyTerm, SearchQuery};

/// Replays canned replies in order, then answers `{}`
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub calls: AtomicUsize,
    /// (system, user) per call
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedLlm {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let llm = Self::default();
        llm.replies
            .lock()
            .unwrap()
            .extend(replies.into_iter().map(|r| Ok(r.into())));
        llm
    }

    pub fn failing(message: &str) -> Self {
        let llm = Self::default();
        llm.replies.lock().unwrap().push_back(Err(message.to_string()));
        llm
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok("{}".to_string()),
        }
    }

    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.chat(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "Test"
    }
}

/// Fixed candidate list; can be told to fail or panic
#[derive(Default)]
pub struct StubOntology {
    pub terms: Vec<OntologyTerm>,
    pub fail: bool,
    pub panic: bool,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl StubOntology {
    pub fn with_terms(terms: Vec<OntologyTerm>) -> Self {
        Self {
            terms,
            ..Self::default()
        }
    }
}

#[async_trait]
impl OntologySearch for StubOntology {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<OntologyTerm>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if self.panic {
            panic!("ontology stub panicked");
        }
        if self.fail {
            return Err(anyhow!("ontology service unavailable"));
        }
        Ok(self.terms.clone())
    }

    fn source_name(&self) -> &str {
        "stub"
    }
}

pub fn heart_terms() -> Vec<OntologyTerm> {
    vec![
        OntologyTerm::new("UBERON:0000948", "heart")
            .with_definition("A hollow, muscular organ"),
        OntologyTerm::new("UBERON:0004146", "primitive heart"),
    ]
}
