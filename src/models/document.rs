// file: src/models/document.rs
// description: loosely-structured search index document with defensive field access
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record returned by the search index. There is no fixed schema;
/// fields are addressed by name and may be absent, a scalar, or a list.
/// Raw values never leave this type: `get_values`/`get_first_value` are the
/// only way to read a field, and they coerce everything to strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SolrDocument(Map<String, Value>);

impl SolrDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    fn raw_value(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Normalize any stored representation of a field into a list of strings.
    /// Malformed values degrade to an empty list, never an error.
    pub fn get_values(&self, field: &str) -> Vec<String> {
        match self.raw_value(field) {
            Some(Value::Array(values)) => values.iter().filter_map(scalar_string).collect(),
            Some(value) => scalar_string(value).map_or_else(Vec::new, |s| vec![s]),
            None => Vec::new(),
        }
    }

    /// Shortcut for multi-value fields that only ever hold one value.
    pub fn get_first_value(&self, field: &str) -> String {
        self.get_values(field).into_iter().next().unwrap_or_default()
    }
}

impl From<Map<String, Value>> for SolrDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(render_number(n)),
        _ => None,
    }
}

// Integers render plainly; fractional values keep 8 decimal places to match
// the index's stored precision.
fn render_number(number: &serde_json::Number) -> String {
    if let Some(i) = number.as_i64() {
        i.to_string()
    } else if let Some(u) = number.as_u64() {
        u.to_string()
    } else {
        format!("{:.8}", number.as_f64().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> SolrDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_field_round_trip() {
        let doc = doc(json!({ "title_a": "The Art of Fugue" }));
        assert_eq!(doc.get_values("title_a"), vec!["The Art of Fugue"]);
        assert_eq!(doc.get_first_value("title_a"), "The Art of Fugue");
    }

    #[test]
    fn test_string_list_field() {
        let doc = doc(json!({ "isbn_a": ["9780486255637", "0486255638"] }));
        assert_eq!(
            doc.get_values("isbn_a"),
            vec!["9780486255637", "0486255638"]
        );
        assert_eq!(doc.get_first_value("isbn_a"), "9780486255637");
    }

    #[test]
    fn test_fractional_number_renders_with_eight_places() {
        let doc = doc(json!({ "score": 3.5 }));
        assert_eq!(doc.get_values("score"), vec!["3.50000000"]);
    }

    #[test]
    fn test_integer_number_renders_plainly() {
        let doc = doc(json!({ "count": 42 }));
        assert_eq!(doc.get_values("count"), vec!["42"]);
    }

    #[test]
    fn test_mixed_scalar_list_is_coerced() {
        let doc = doc(json!({ "mixed": ["a", 2, 1.5] }));
        assert_eq!(doc.get_values("mixed"), vec!["a", "2", "1.50000000"]);
    }

    #[test]
    fn test_absent_field_is_empty() {
        let doc = SolrDocument::new();
        assert!(doc.get_values("missing").is_empty());
        assert_eq!(doc.get_first_value("missing"), "");
    }

    #[test]
    fn test_malformed_values_degrade_to_empty() {
        let doc = doc(json!({
            "object": { "nested": true },
            "flag": true,
            "nothing": null,
            "list": [{ "nested": true }, null]
        }));
        assert!(doc.get_values("object").is_empty());
        assert!(doc.get_values("flag").is_empty());
        assert!(doc.get_values("nothing").is_empty());
        assert!(doc.get_values("list").is_empty());
    }
}
