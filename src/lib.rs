//! ontogent - resolve free-text anatomy descriptions to UBERON terms
//!
//! A language model reads the query and suggests a search string, the EBI
//! Ontology Lookup Service returns candidates, and the best candidate is
//! picked by a lexical heuristic or, failing that, a second model call.
//!
//! ```rust,no_run
//! use ontogent::{agentic, ontology, Settings, ResolutionPipeline};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! let llm = agentic::create_llm_client(&settings)?;
//! let search = ontology::connect(&settings).await?;
//! let pipeline = ResolutionPipeline::new(llm, search);
//!
//! let result = pipeline.find_term("embryonic heart").await;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

pub mod agentic;
pub mod config;
pub mod error;
pub mod logging;
pub mod ontology;
pub mod resolution;

pub use config::Settings;
pub use error::{ConfigError, OntologyError};
pub use ontology::{OntologySearch, OntologyTerm, SearchQuery, SearchResult};
pub use resolution::ResolutionPipeline;
