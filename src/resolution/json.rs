//! Model-output JSON helpers

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strip surrounding whitespace and a single markdown code fence
///
/// Text that already opens as a JSON object or array is returned trimmed;
/// backticks inside its strings are left alone.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with('{') || text.starts_with('[') {
        return text;
    }

    let fenced = if text.contains("```json") {
        text.split("```json").nth(1)
    } else if text.contains("```") {
        text.split("```").nth(1)
    } else {
        None
    };

    fenced
        .and_then(|s| s.split("```").next())
        .unwrap_or(text)
        .trim()
}

/// Parse model output that must be a single JSON object of shape `T`
///
/// Anything else (free text, arrays, fields `T` cannot accept) is `None`.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str::<Value>(extract_json(text)) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| tracing::debug!(error = %e, "Model JSON has unexpected shape"))
            .ok(),
        Ok(_) => {
            tracing::debug!("Model output is JSON but not an object");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Model output is not valid JSON");
            None
        }
    }
}
