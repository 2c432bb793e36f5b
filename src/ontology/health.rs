//! OLS API health check
//!
//! Probes the search and term endpoints once each and reports what worked.
//! Used by the `check_api` binary to diagnose connectivity problems.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::parse::search_docs;

const PROBE_QUERY: &str = "heart";
const PROBE_LOCAL_ID: &str = "0000948";

/// Outcome of probing one endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EndpointHealth {
    pub url: String,
    pub accessible: bool,
    pub status_code: Option<u16>,
    pub json_valid: Option<bool>,
    pub structure_valid: bool,
    /// Top-level keys, reported only when the structure is unexpected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiHealthReport {
    pub base_url: String,
    pub ontology: String,
    pub search: EndpointHealth,
    pub term: EndpointHealth,
    pub error: Option<String>,
    pub api_healthy: bool,
    pub recommendation: String,
    /// RFC 3339
    pub timestamp: String,
}

pub async fn check_api_health(
    base_url: &str,
    ontology: &str,
    timeout: Duration,
) -> ApiHealthReport {
    let base_url = base_url.trim_end_matches('/').to_string();
    let ontology = ontology.to_lowercase();

    let mut report = ApiHealthReport {
        search: EndpointHealth {
            url: format!("{}/search", base_url),
            ..Default::default()
        },
        term: EndpointHealth {
            url: format!("{}/ontologies/{}/terms", base_url, ontology),
            ..Default::default()
        },
        base_url,
        ontology,
        error: None,
        api_healthy: false,
        recommendation: String::new(),
        timestamp: Utc::now().to_rfc3339(),
    };

    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            report.error = Some(format!("Failed to create HTTP client: {}", e));
            report.recommendation = "Error checking API health, recommend using dev mode".into();
            return report;
        }
    };

    let search_params = [
        ("q", PROBE_QUERY.to_string()),
        ("ontology", report.ontology.clone()),
        ("rows", "1".to_string()),
    ];
    let search = probe(&client, &mut report.search, &search_params, |data| {
        search_docs(data).is_some()
    })
    .await;

    let term_params = [(
        "obo_id",
        format!("{}:{}", report.ontology.to_uppercase(), PROBE_LOCAL_ID),
    )];
    let term = probe(&client, &mut report.term, &term_params, |data| {
        data.pointer("/_embedded/terms")
            .and_then(Value::as_array)
            .is_some()
    })
    .await;

    report.error = search.err().or(term.err());
    report.recommendation = recommend(&report).to_string();
    report.api_healthy = report.error.is_none()
        && report.search.structure_valid
        && report.term.structure_valid;

    if report.api_healthy {
        tracing::info!(base_url = %report.base_url, "OLS API healthy");
    } else {
        tracing::warn!(
            base_url = %report.base_url,
            recommendation = %report.recommendation,
            "OLS API unhealthy"
        );
    }
    report
}

/// Fill in `health` for one GET; `Err` carries transport failures only
async fn probe<F>(
    client: &Client,
    health: &mut EndpointHealth,
    params: &[(&str, String)],
    valid_structure: F,
) -> Result<(), String>
where
    F: Fn(&Value) -> bool,
{
    let response = client
        .get(&health.url)
        .query(params)
        .send()
        .await
        .map_err(|e| format!("Request error: {}", e))?;

    let status = response.status();
    health.status_code = Some(status.as_u16());
    health.accessible = status.is_success();
    if !health.accessible {
        return Ok(());
    }

    let text = response
        .text()
        .await
        .map_err(|e| format!("Request error: {}", e))?;
    match serde_json::from_str::<Value>(&text) {
        Ok(data) => {
            health.json_valid = Some(true);
            health.structure_valid = valid_structure(&data);
            if !health.structure_valid {
                health.response_keys = data
                    .as_object()
                    .map(|o| o.keys().cloned().collect());
            }
        }
        Err(e) => {
            tracing::debug!(url = %health.url, error = %e, "Health probe returned invalid JSON");
            health.json_valid = Some(false);
        }
    }
    Ok(())
}

fn recommend(report: &ApiHealthReport) -> &'static str {
    let (search, term) = (&report.search, &report.term);
    if report.error.is_some() {
        "Cannot connect to API, recommend using dev mode"
    } else if !search.accessible || !term.accessible {
        "API endpoints are not accessible, recommend using dev mode"
    } else if search.json_valid != Some(true) || term.json_valid != Some(true) {
        "API responses are not valid JSON, recommend using dev mode"
    } else if !search.structure_valid || !term.structure_valid {
        "API responses don't have expected structure, recommend using dev mode"
    } else {
        "API appears to be working correctly"
    }
}

fn write_endpoint(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    health: &EndpointHealth,
) -> fmt::Result {
    writeln!(f, "\n{} endpoint: {}", name, health.url)?;
    writeln!(f, "  Accessible: {}", health.accessible)?;
    if let Some(code) = health.status_code {
        writeln!(f, "  Status code: {}", code)?;
    }
    if let Some(valid) = health.json_valid {
        writeln!(f, "  Valid JSON: {}", valid)?;
        writeln!(f, "  Valid structure: {}", health.structure_valid)?;
    }
    if let Some(keys) = &health.response_keys {
        writeln!(f, "  Response keys: {}", keys.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for ApiHealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EBI OLS4 API Health Check ===")?;
        writeln!(f, "Base URL: {}", self.base_url)?;
        writeln!(f, "Ontology: {}", self.ontology)?;
        write_endpoint(f, "Search", &self.search)?;
        write_endpoint(f, "Term", &self.term)?;
        writeln!(f, "\nSummary:")?;
        if let Some(error) = &self.error {
            writeln!(f, "  Error: {}", error)?;
        }
        writeln!(
            f,
            "  API status: {}",
            if self.api_healthy { "Healthy" } else { "Unhealthy" }
        )?;
        writeln!(f, "  Recommendation: {}", self.recommendation)?;
        write!(f, "  Checked at: {}", self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_healthy_api() {
        let mut server = mockito::Server::new_async().await;
        let _search = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "heart".into()))
            .with_status(200)
            .with_body(r#"{"response": {"docs": []}}"#)
            .create_async()
            .await;
        let _term = server
            .mock("GET", "/ontologies/uberon/terms")
            .match_query(Matcher::UrlEncoded("obo_id".into(), "UBERON:0000948".into()))
            .with_status(200)
            .with_body(r#"{"_embedded": {"terms": [{"label": "heart"}]}}"#)
            .create_async()
            .await;

        let report = check_api_health(&server.url(), "uberon", Duration::from_secs(5)).await;

        assert!(report.api_healthy);
        assert_eq!(report.search.status_code, Some(200));
        assert!(report.search.response_keys.is_none());
        assert_eq!(report.recommendation, "API appears to be working correctly");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        assert!(report.to_string().contains("API status: Healthy"));
    }

    #[tokio::test]
    async fn test_unexpected_structure_reports_keys() {
        let mut server = mockito::Server::new_async().await;
        let _search = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error": "maintenance"}"#)
            .create_async()
            .await;
        let _term = server
            .mock("GET", "/ontologies/uberon/terms")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let report = check_api_health(&server.url(), "uberon", Duration::from_secs(5)).await;

        assert!(!report.api_healthy);
        assert_eq!(report.search.response_keys, Some(vec!["error".to_string()]));
        assert!(!report.term.accessible);
        assert_eq!(report.term.status_code, Some(500));
        assert!(report.recommendation.contains("not accessible"));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let report =
            check_api_health("http://127.0.0.1:1", "uberon", Duration::from_millis(500)).await;

        assert!(!report.api_healthy);
        assert!(report.error.as_deref().unwrap_or("").starts_with("Request error"));
        assert!(report.recommendation.contains("Cannot connect"));
    }
}
