//! OLS response parsing
//!
//! Converts the loosely-shaped documents returned by the EBI Ontology Lookup
//! Service into [`OntologyTerm`] values. Fields arrive as strings, lists of
//! strings or lists of objects depending on endpoint and OLS version, so every
//! accessor here tolerates all three.

use serde_json::Value;

use super::types::OntologyTerm;

const PURL_BASE: &str = "http://purl.obolibrary.org/obo";

/// Parse a search response into terms carrying the given id prefix
///
/// Accepts the Solr layout (`response.docs`), `results`, `terms` or a bare
/// array. Anything else yields no terms.
pub fn parse_search_response(data: &Value, prefix: &str) -> Vec<OntologyTerm> {
    let Some(docs) = search_docs(data) else {
        let keys: Vec<&str> = data
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        tracing::warn!(?keys, "Unexpected ontology search response format");
        return Vec::new();
    };

    docs.iter()
        .filter_map(|doc| {
            let term = parse_document(doc, prefix);
            if term.is_none() {
                tracing::debug!(%doc, "Skipping document without usable id or label");
            }
            term
        })
        .collect()
}

/// The document list of a search response, if it has a recognised layout
pub fn search_docs(data: &Value) -> Option<&Vec<Value>> {
    data.pointer("/response/docs")
        .or_else(|| data.get("results"))
        .or_else(|| data.get("terms"))
        .unwrap_or(data)
        .as_array()
}

/// Parse a term-lookup response (`_embedded.terms[0]` or a bare term object)
pub fn parse_term_response(data: &Value, prefix: &str) -> Option<OntologyTerm> {
    let doc = data
        .pointer("/_embedded/terms/0")
        .or_else(|| data.get("term"))
        .unwrap_or(data);
    parse_document(doc, prefix)
}

/// Parse one document; `None` when it lacks a label or an id in `prefix`
pub fn parse_document(doc: &Value, prefix: &str) -> Option<OntologyTerm> {
    let id = document_id(doc, prefix)?;
    if !has_prefix(&id, prefix) {
        return None;
    }

    let label = doc
        .get("label")
        .and_then(first_string)
        .filter(|l| !l.trim().is_empty())?;

    let url = ["iri", "url"]
        .iter()
        .find_map(|key| doc.get(*key).and_then(first_string))
        .unwrap_or_else(|| format!("{}/{}", PURL_BASE, id.replace(':', "_")));

    Some(OntologyTerm {
        definition: definition(doc),
        synonyms: synonyms(doc),
        parent_ids: ["is_a", "parents"]
            .iter()
            .filter_map(|key| doc.get(*key))
            .flat_map(reference_ids)
            .collect(),
        url,
        label,
        id,
    })
}

/// Normalise an identifier to CURIE form (`NS:LOCAL`)
///
/// Accepts CURIEs, `NS_LOCAL` short forms and full IRIs. Bare local ids are
/// not handled here because they need the document's ontology prefix.
pub fn normalize_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let tail = raw.rsplit(|c| c == '/' || c == '#').next().unwrap_or(raw);
    let (ns, local) = tail.split_once(':').or_else(|| tail.split_once('_'))?;
    if ns.is_empty() || local.is_empty() {
        return None;
    }
    Some(format!("{}:{}", ns, local))
}

fn document_id(doc: &Value, prefix: &str) -> Option<String> {
    for key in ["obo_id", "curie"] {
        let id = doc
            .get(key)
            .and_then(first_string)
            .and_then(|s| normalize_id(&s));
        if id.is_some() {
            return id;
        }
    }

    // Bare local ids take the document's prefix, else the configured one
    let namespace = doc
        .get("ontology_prefix")
        .and_then(first_string)
        .unwrap_or_else(|| prefix.to_string());
    ["short_form", "id"]
        .iter()
        .filter_map(|key| doc.get(*key).and_then(first_string))
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .find_map(|raw| {
            normalize_id(&raw).or_else(|| {
                raw.chars()
                    .all(|c| c.is_ascii_alphanumeric())
                    .then(|| format!("{}:{}", namespace, raw))
            })
        })
}

fn has_prefix(id: &str, prefix: &str) -> bool {
    id.split_once(':')
        .map(|(ns, _)| ns.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn definition(doc: &Value) -> String {
    doc.get("description")
        .and_then(first_string)
        .or_else(|| doc.get("def").and_then(first_string))
        .or_else(|| {
            doc.pointer("/obo_definition_citation/0/definition")
                .and_then(first_string)
        })
        .unwrap_or_default()
}

fn synonyms(doc: &Value) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: String| {
        let s = s.trim().to_string();
        if !s.is_empty() && !out.contains(&s) {
            out.push(s);
        }
    };

    if let Some(value) = doc.get("synonym") {
        all_strings(value, &["synonym", "name"]).into_iter().for_each(&mut push);
    }
    if let Some(value) = doc.get("obo_synonym") {
        all_strings(value, &["synonym", "name"]).into_iter().for_each(&mut push);
    }
    // Older endpoints return a comma-separated string
    if let Some(value) = doc.get("synonyms") {
        match value {
            Value::String(s) => s.split(',').map(str::to_string).for_each(&mut push),
            other => all_strings(other, &["synonym", "name"])
                .into_iter()
                .for_each(&mut push),
        }
    }
    out
}

fn reference_ids(value: &Value) -> Vec<String> {
    all_strings(value, &["obo_id", "curie", "iri"])
        .iter()
        .filter_map(|s| normalize_id(s))
        .collect()
}

/// First string in a string-or-list field
fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
}

/// Every string in a string, list-of-strings or list-of-objects field;
/// objects contribute the first of `object_keys` they carry
fn all_strings(value: &Value, object_keys: &[&str]) -> Vec<String> {
    let from_item = |item: &Value| match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => object_keys
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str).map(str::to_string)),
        _ => None,
    };
    match value {
        Value::Array(items) => items.iter().filter_map(from_item).collect(),
        other => from_item(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs(docs: Value) -> Vec<OntologyTerm> {
        parse_search_response(&json!({ "response": { "docs": docs } }), "UBERON")
    }

    #[test]
    fn test_empty_and_unrecognised_layouts() {
        assert!(docs(json!([])).is_empty());
        assert!(parse_search_response(&json!({"bad_key": "value"}), "UBERON").is_empty());
    }

    #[test]
    fn test_alternative_layouts() {
        let doc = json!({"obo_id": "UBERON:0000948", "label": "heart"});
        for data in [
            json!({ "results": [doc.clone()] }),
            json!({ "terms": [doc.clone()] }),
            json!([doc.clone()]),
        ] {
            let terms = parse_search_response(&data, "UBERON");
            assert_eq!(terms.len(), 1);
            assert_eq!(terms[0].id, "UBERON:0000948");
        }
    }

    #[test]
    fn test_missing_label_is_skipped() {
        let terms = docs(json!([{
            "id": "http://purl.obolibrary.org/obo/UBERON_0000948",
            "short_form": "UBERON_0000948"
        }]));
        assert!(terms.is_empty());
    }

    #[test]
    fn test_id_formats() {
        let terms = docs(json!([
            {"obo_id": "UBERON:0000948", "label": "heart", "ontology_prefix": "UBERON"},
            {"curie": "UBERON:0004146", "label": "primitive heart"},
            {"short_form": "0000123", "label": "some term", "ontology_prefix": "UBERON"},
            {"short_form": "UBERON_0000456", "label": "another term"}
        ]));
        let ids: Vec<&str> = terms.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "UBERON:0000948",
                "UBERON:0004146",
                "UBERON:0000123",
                "UBERON:0000456"
            ]
        );
    }

    #[test]
    fn test_legacy_bare_id_takes_configured_prefix() {
        let terms = parse_search_response(
            &json!({"results": [{"id": "0002107", "label": "liver", "synonyms": "hepar, jecur"}]}),
            "UBERON",
        );
        assert_eq!(terms[0].id, "UBERON:0002107");
        assert_eq!(terms[0].synonyms, vec!["hepar", "jecur"]);
    }

    #[test]
    fn test_foreign_ontology_terms_are_dropped() {
        let terms = docs(json!([
            {"obo_id": "UBERON:0000948", "label": "heart"},
            {"obo_id": "GO:0005634", "label": "nucleus"}
        ]));
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].id, "UBERON:0000948");
    }

    #[test]
    fn test_synonym_formats() {
        let terms = docs(json!([
            {"obo_id": "UBERON:0000948", "label": "heart", "synonym": "cardiac muscle"},
            {"obo_id": "UBERON:0004146", "label": "primitive heart",
             "synonym": ["embryonic heart", "heart primordium"]},
            {"obo_id": "UBERON:0002101", "label": "limb",
             "obo_synonym": [{"synonym": "extremity"}, {"name": "appendage"}]},
            {"obo_id": "UBERON:0000033", "label": "head",
             "obo_synonym": ["caput", "cephalic region"]}
        ]));
        assert_eq!(terms[0].synonyms, vec!["cardiac muscle"]);
        assert_eq!(terms[1].synonyms, vec!["embryonic heart", "heart primordium"]);
        assert_eq!(terms[2].synonyms, vec!["extremity", "appendage"]);
        assert!(terms[3].synonyms.contains(&"caput".to_string()));
    }

    #[test]
    fn test_definition_formats() {
        let terms = docs(json!([
            {"obo_id": "UBERON:0000948", "label": "heart",
             "description": "A hollow, muscular organ"},
            {"obo_id": "UBERON:0004146", "label": "primitive heart",
             "description": ["The developing heart at an early stage"]},
            {"obo_id": "UBERON:0002101", "label": "limb",
             "def": "An appendage that projects from the body"},
            {"obo_id": "UBERON:0000033", "label": "head",
             "obo_definition_citation": [{"definition": "Most anterior part of the body"}]},
            {"obo_id": "UBERON:0000062", "label": "organ"}
        ]));
        assert_eq!(terms[0].definition, "A hollow, muscular organ");
        assert_eq!(terms[1].definition, "The developing heart at an early stage");
        assert_eq!(terms[2].definition, "An appendage that projects from the body");
        assert_eq!(terms[3].definition, "Most anterior part of the body");
        assert_eq!(terms[4].definition, "");
    }

    #[test]
    fn test_term_response_with_parents() {
        let term = parse_term_response(
            &json!({
                "iri": "http://purl.obolibrary.org/obo/UBERON_0000948",
                "obo_id": "UBERON:0000948",
                "label": "heart",
                "description": "A hollow, muscular organ",
                "synonym": ["cardiac muscle", "heart muscle"],
                "is_a": ["UBERON_0000077", "http://purl.obolibrary.org/obo/UBERON_0000062"],
                "parents": [{"obo_id": "UBERON:0000077"}]
            }),
            "UBERON",
        )
        .unwrap();

        assert_eq!(term.id, "UBERON:0000948");
        assert_eq!(term.url, "http://purl.obolibrary.org/obo/UBERON_0000948");
        assert_eq!(term.synonyms.len(), 2);
        let parents: Vec<&str> = term.parent_ids.iter().map(String::as_str).collect();
        assert_eq!(parents, vec!["UBERON:0000062", "UBERON:0000077"]);
    }

    #[test]
    fn test_embedded_term_response_and_default_url() {
        let term = parse_term_response(
            &json!({"_embedded": {"terms": [{"obo_id": "UBERON:0002107", "label": "liver"}]}}),
            "UBERON",
        )
        .unwrap();
        assert_eq!(term.label, "liver");
        assert_eq!(term.url, "http://purl.obolibrary.org/obo/UBERON_0002107");
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("UBERON:0000948").as_deref(), Some("UBERON:0000948"));
        assert_eq!(normalize_id("UBERON_0000948").as_deref(), Some("UBERON:0000948"));
        assert_eq!(
            normalize_id("http://purl.obolibrary.org/obo/UBERON_0000948").as_deref(),
            Some("UBERON:0000948")
        );
        assert_eq!(normalize_id("0000948"), None);
        assert_eq!(normalize_id(""), None);
    }
}
