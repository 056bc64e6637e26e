//! Tolerant decoding of generation output.
//!
//! The service is untrusted: it may wrap JSON in markdown fences, pick
//! different key names from one call to the next, or return numbers as
//! strings. Every accessor here returns `None`/empty rather than failing,
//! so callers re-validate each field.

use serde_json::Value;
use spellkit_core::LlmError;

/// Strip markdown code fences and surrounding whitespace.
pub fn clean_json(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse generation output into a JSON value.
///
/// Falls back to the outermost `{...}` or `[...]` span when the text carries
/// prose around the payload.
pub fn decode_json(provider: &str, text: &str) -> Result<Value, LlmError> {
    let cleaned = clean_json(text);
    if cleaned.is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason: "empty response".to_string(),
        });
    }

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => Ok(value),
        Err(first_err) => outermost_span(&cleaned)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: provider.to_string(),
                reason: format!("not valid JSON: {}", first_err),
            }),
    }
}

fn outermost_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// The item list of a payload: the payload itself when it is an array,
/// otherwise the first array found under one of `keys`.
pub fn extract_items(value: &Value, keys: &[&str]) -> Vec<Value> {
    if let Some(items) = value.as_array() {
        return items.clone();
    }
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// First non-empty string under any of `keys`, trimmed.
pub fn field_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// First integer under any of `keys`; numeric strings are accepted.
pub fn field_int(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// String list under the first of `keys` holding an array. Non-string
/// entries and blanks are skipped.
pub fn field_strings(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json_strips_fences() {
        let raw = "```json\n{\"items\": []}\n```";
        assert_eq!(clean_json(raw), "{\"items\": []}");
    }

    #[test]
    fn test_decode_json_with_prose() {
        let raw = "Here you go: {\"w\": [\"boom\"]} hope this helps";
        let value = decode_json("gemini", raw).unwrap();
        assert_eq!(value["w"][0], "boom");
    }

    #[test]
    fn test_decode_json_rejects_garbage() {
        let err = decode_json("gemini", "no json here").unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse { .. }));
        assert!(decode_json("gemini", "   ").is_err());
    }

    #[test]
    fn test_extract_items_key_variance() {
        let a = json!({"items": [1, 2]});
        let b = json!({"words": [1]});
        let c = json!([1, 2, 3]);
        let keys = ["items", "words"];
        assert_eq!(extract_items(&a, &keys).len(), 2);
        assert_eq!(extract_items(&b, &keys).len(), 1);
        assert_eq!(extract_items(&c, &keys).len(), 3);
        assert!(extract_items(&json!({"other": []}), &keys).is_empty());
    }

    #[test]
    fn test_field_accessors() {
        let item = json!({"woord": "  bank ", "categorie": "4", "choices": ["ng", 3, "nk", ""]});
        assert_eq!(field_str(&item, &["word", "woord"]), Some("bank".to_string()));
        assert_eq!(field_int(&item, &["categoryId", "categorie"]), Some(4));
        assert_eq!(field_strings(&item, &["choices"]), vec!["ng", "nk"]);
        assert_eq!(field_str(&item, &["missing"]), None);
    }
}
