//! OLS API Client
//!
//! HTTP client for the EBI Ontology Lookup Service (OLS4). GET requests are
//! retried on throttling, gateway errors and transport failures with an
//! exponential backoff.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::sleep;
use url::Url;

use super::parse::{parse_search_response, parse_term_response, search_docs};
use super::search::OntologySearch;
use super::types::{OntologyTerm, SearchQuery};
use crate::config::OntologySettings;
use crate::error::OntologyError;

const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);
const PROBE_QUERY: &str = "heart";

pub struct OlsClient {
    client: Client,
    settings: OntologySettings,
    backoff_base: Duration,
}

impl OlsClient {
    pub fn new(settings: OntologySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(
            base_url = %settings.base_url,
            ontology = %settings.ontology,
            "OLS client initialized"
        );

        Ok(Self {
            client,
            settings,
            backoff_base: DEFAULT_BACKOFF_BASE,
        })
    }

    /// Override the first retry delay; later retries double it
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, OntologyError> {
        let raw = format!("{}/{}", self.settings.base_url, path);
        Url::parse(&raw).map_err(|source| OntologyError::Url { url: raw, source })
    }

    fn search_url(&self, query: &str, rows: usize) -> Result<Url, OntologyError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("ontology", &self.settings.ontology)
            .append_pair("rows", &rows.to_string());
        Ok(url)
    }

    /// GET a JSON document, retrying transient failures
    ///
    /// `Ok(None)` means the service answered 404.
    async fn get_json(&self, url: &Url) -> Result<Option<Value>, OntologyError> {
        let mut attempt = 0;
        loop {
            let outcome = self.try_get(url).await;
            let retryable = match &outcome {
                Ok(_) => false,
                Err(OntologyError::Status { status, .. }) => RETRY_STATUSES.contains(status),
                Err(OntologyError::Http(e)) => e.is_timeout() || e.is_connect() || e.is_request(),
                Err(_) => false,
            };

            if !retryable || attempt >= self.settings.max_retries {
                return outcome;
            }

            let delay = self.backoff_base * 2u32.saturating_pow(attempt);
            if let Err(e) = &outcome {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = self.settings.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying OLS request"
                );
            }
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn try_get(&self, url: &Url) -> Result<Option<Value>, OntologyError> {
        tracing::debug!(%url, "Sending OLS request");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OntologyError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Free-text search, at most `rows` terms in the service's relevance order
    pub async fn search_terms(&self, query: &str, rows: usize) -> Result<Vec<OntologyTerm>> {
        let rows = rows.min(self.settings.max_results).max(1);
        let url = self.search_url(query, rows)?;

        let data = self
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to search {} for '{}'", self.settings.ontology, query))?;

        let mut terms = data
            .map(|d| parse_search_response(&d, &self.settings.id_prefix))
            .unwrap_or_default();
        terms.truncate(rows);

        tracing::debug!(query, count = terms.len(), "OLS search complete");
        Ok(terms)
    }

    /// Look up one term by CURIE, `None` if the service does not know it
    pub async fn get_term_by_id(&self, term_id: &str) -> Result<Option<OntologyTerm>> {
        let mut url = self.endpoint(&format!("ontologies/{}/terms", self.settings.ontology))?;
        url.query_pairs_mut().append_pair("obo_id", term_id);

        let data = self
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch term {}", term_id))?;

        Ok(data.and_then(|d| parse_term_response(&d, &self.settings.id_prefix)))
    }

    /// Probe the search endpoint with a single-row query
    pub async fn test_connection(&self) -> bool {
        tracing::info!("Testing connection to OLS API");

        let url = match self.search_url(PROBE_QUERY, 1) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "Cannot build OLS probe URL");
                return false;
            }
        };

        match self.try_get(&url).await {
            Ok(Some(data)) if search_docs(&data).is_some() => {
                tracing::info!("OLS API connection successful");
                true
            }
            Ok(Some(_)) => {
                tracing::warn!("OLS API responded but with an unexpected data format");
                false
            }
            Ok(None) => {
                tracing::warn!(%url, "OLS search endpoint not found");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Error connecting to OLS API");
                false
            }
        }
    }
}

#[async_trait]
impl OntologySearch for OlsClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<OntologyTerm>> {
        self.search_terms(&query.query, query.max_results).await
    }

    fn source_name(&self) -> &str {
        "OLS"
    }
}
