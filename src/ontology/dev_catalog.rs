//! Built-in term catalogue for development mode
//!
//! A handful of common anatomy terms so the pipeline can run without network
//! access. Also used when the OLS probe fails at startup.

use anyhow::Result;
use async_trait::async_trait;

use super::search::OntologySearch;
use super::types::{OntologyTerm, SearchQuery};

struct Entry {
    key: &'static str,
    terms: Vec<OntologyTerm>,
}

pub struct DevCatalog {
    entries: Vec<Entry>,
}

fn term(
    id: &str,
    label: &str,
    definition: &str,
    synonyms: &[&str],
    parent: &str,
) -> OntologyTerm {
    OntologyTerm::new(id, label)
        .with_definition(definition)
        .with_synonyms(synonyms.iter().copied())
        .with_parents([parent])
        .with_url(format!("http://purl.obolibrary.org/obo/{}", id.replace(':', "_")))
}

impl DevCatalog {
    pub fn new() -> Self {
        let entry = |key: &'static str, terms: Vec<OntologyTerm>| Entry { key, terms };
        let entries = vec![
            entry(
                "heart",
                vec![
                    term(
                        "UBERON:0000948",
                        "heart",
                        "A hollow, muscular organ, which, by contracting rhythmically, keeps up \
                         the circulation of the blood.",
                        &["cardiac muscle"],
                        "UBERON:0000077",
                    ),
                    term(
                        "UBERON:0004146",
                        "primitive heart",
                        "The developing heart at the cardiac crescent stage.",
                        &["embryonic heart"],
                        "UBERON:0000948",
                    ),
                ],
            ),
            entry(
                "liver",
                vec![term(
                    "UBERON:0002107",
                    "liver",
                    "A large, reddish-brown glandular organ in the abdominal cavity that is \
                     responsible for detoxifying metabolites, synthesizing proteins, and \
                     producing biochemicals necessary for digestion.",
                    &["hepar"],
                    "UBERON:0001434",
                )],
            ),
            entry(
                "brain",
                vec![term(
                    "UBERON:0000955",
                    "brain",
                    "The brain is the center of the nervous system in all vertebrate and most \
                     invertebrate animals.",
                    &["encephalon"],
                    "UBERON:0000062",
                )],
            ),
            entry(
                "lung",
                vec![term(
                    "UBERON:0002048",
                    "lung",
                    "Either of the pair of organs occupying the chest cavity that effect the \
                     aeration of the blood.",
                    &["pulmo"],
                    "UBERON:0001004",
                )],
            ),
            entry(
                "kidney",
                vec![term(
                    "UBERON:0002113",
                    "kidney",
                    "Organ that filters blood and excretes urine and regulates blood ionic \
                     composition, volume, and pH.",
                    &["ren"],
                    "UBERON:0001008",
                )],
            ),
            entry(
                "blood",
                vec![term(
                    "UBERON:0000178",
                    "blood",
                    "A fluid that circulates throughout the heart and blood vessels, carrying \
                     oxygen and nutrients to cells and waste materials away from them.",
                    &["haema", "hema"],
                    "UBERON:0000479",
                )],
            ),
            entry(
                "bone",
                vec![term(
                    "UBERON:0002371",
                    "bone",
                    "Rigid connective tissue that makes up the skeletal system of vertebrates.",
                    &["os"],
                    "UBERON:0000061",
                )],
            ),
        ];
        Self { entries }
    }

    /// Terms for a free-text query
    ///
    /// A key appearing as a whole word wins outright; otherwise every key
    /// contained anywhere in the query contributes its terms.
    pub fn lookup(&self, query: &str) -> Vec<OntologyTerm> {
        let query = query.trim().to_lowercase();
        let padded = format!(" {} ", query);

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| padded.contains(&format!(" {} ", e.key)))
        {
            tracing::debug!(key = entry.key, "Whole-word match in development catalogue");
            return entry.terms.clone();
        }

        let partial: Vec<OntologyTerm> = self
            .entries
            .iter()
            .filter(|e| query.contains(e.key))
            .flat_map(|e| e.terms.iter().cloned())
            .collect();

        if partial.is_empty() {
            tracing::warn!(%query, "No terms in development catalogue");
        }
        partial
    }

    pub fn get_term_by_id(&self, term_id: &str) -> Option<OntologyTerm> {
        self.entries
            .iter()
            .flat_map(|e| e.terms.iter())
            .find(|t| t.id == term_id)
            .cloned()
    }
}

impl Default for DevCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OntologySearch for DevCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<OntologyTerm>> {
        let mut terms = self.lookup(&query.query);
        terms.truncate(query.max_results);
        Ok(terms)
    }

    fn source_name(&self) -> &str {
        "development catalogue"
    }
}
