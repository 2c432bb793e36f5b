//! Development mode runs fully offline

use ontogent::{agentic, ontology, ResolutionPipeline, Settings};

fn dev_settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "ONTOGENT_DEV_MODE" => Some("true".to_string()),
        _ => None,
    })
    .unwrap()
}

async fn dev_pipeline() -> ResolutionPipeline {
    let settings = dev_settings();
    let llm = agentic::create_llm_client(&settings).unwrap();
    let search = ontology::connect(&settings).await.unwrap();
    ResolutionPipeline::new(llm, search)
}

#[tokio::test]
async fn test_heart_resolves_by_label() {
    let result = dev_pipeline().await.find_term("heart").await;

    assert_eq!(result.total_matches(), 2);
    let best = result.best_match().unwrap();
    assert_eq!(best.id, "UBERON:0000948");
    assert!(best.synonyms.contains(&"cardiac muscle".to_string()));
}

#[tokio::test]
async fn test_single_catalogue_hit() {
    let result = dev_pipeline().await.find_term("human liver").await;

    assert_eq!(result.best_match().unwrap().id, "UBERON:0002107");
    assert_eq!(result.confidence(), 0.8);
}

#[tokio::test]
async fn test_offline_ranking_declines() {
    let result = dev_pipeline().await.find_term("embryonic heart").await;

    assert_eq!(result.total_matches(), 2);
    assert!(result.best_match().is_none());
}

#[tokio::test]
async fn test_unknown_structure() {
    let result = dev_pipeline().await.find_term("elbow").await;
    assert_eq!(result.total_matches(), 0);
    assert_eq!(result.to_string(), "No matches found for query: elbow");
}
