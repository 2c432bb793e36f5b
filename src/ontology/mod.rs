//! Ontology collaborators
//!
//! - [`OlsClient`]: EBI Ontology Lookup Service over HTTP
//! - [`DevCatalog`]: built-in terms for development mode and offline fallback
//!
//! Both implement [`OntologySearch`], the only interface the resolution core
//! depends on.

pub mod dev_catalog;
pub mod health;
pub mod ols_client;
pub mod parse;
pub mod search;
pub mod types;

use std::sync::Arc;

use anyhow::Result;

pub use dev_catalog::DevCatalog;
pub use health::{check_api_health, ApiHealthReport};
pub use ols_client::OlsClient;
pub use search::OntologySearch;
pub use types::{OntologyTerm, SearchQuery, SearchResult};

use crate::config::Settings;

/// Build the ontology collaborator for these settings
///
/// Outside development mode the OLS endpoint is probed once; if it cannot be
/// reached the built-in catalogue is used instead.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn OntologySearch>> {
    if settings.dev_mode {
        tracing::info!("Development mode: using built-in ontology catalogue");
        return Ok(Arc::new(DevCatalog::new()));
    }

    let client = OlsClient::new(settings.ontology.clone())?;
    if client.test_connection().await {
        Ok(Arc::new(client))
    } else {
        tracing::warn!(
            base_url = %settings.ontology.base_url,
            "OLS API is not accessible, falling back to built-in catalogue"
        );
        Ok(Arc::new(DevCatalog::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OntologySettings;
    use std::time::Duration;

    fn settings(dev_mode: bool, base_url: String) -> Settings {
        Settings::from_lookup(|key| match key {
            "ONTOGENT_DEV_MODE" => Some(dev_mode.to_string()),
            "ANTHROPIC_API_KEY" => Some("k".into()),
            _ => None,
        })
        .map(|mut s| {
            s.ontology = OntologySettings {
                base_url: base_url.clone(),
                timeout: Duration::from_millis(500),
                max_retries: 0,
                ..OntologySettings::default()
            };
            s
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_dev_mode_uses_catalogue() {
        let search = connect(&settings(true, "http://127.0.0.1:1".into())).await.unwrap();
        assert_eq!(search.source_name(), "development catalogue");
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let search = connect(&settings(false, "http://127.0.0.1:1".into())).await.unwrap();
        assert_eq!(search.source_name(), "development catalogue");
    }

    #[tokio::test]
    async fn test_reachable_service_is_used() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response": {"docs": []}}"#)
            .create_async()
            .await;

        let search = connect(&settings(false, server.url())).await.unwrap();
        assert_eq!(search.source_name(), "OLS");
    }
}
