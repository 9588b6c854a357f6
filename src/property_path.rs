//! Dotted property paths (`a.b.0.c`) and traversal into a value tree.

use std::fmt;

use serde_json::Value;

/// An ordered list of segments obtained by splitting on `.`.
///
/// The empty string parses to zero segments and addresses the root itself.
/// That is different from `"."`, which addresses the empty-string key twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            segments: raw.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk `root` segment by segment, left to right.
    ///
    /// On failure returns the first segment that could not be found.
    pub fn traverse<'a>(&'a self, root: &'a Value) -> Result<&'a Value, &'a str> {
        let mut current = root;
        for segment in &self.segments {
            current = child(current, segment).ok_or(segment.as_str())?;
        }
        Ok(current)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Key lookup on objects, index lookup on arrays; scalars have no children.
fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => {
            // Canonical base-10 indices only: no sign, no leading zeros
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            if segment.len() > 1 && segment.starts_with('0') {
                return None;
            }
            items.get(segment.parse::<usize>().ok()?)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_path_is_identity() {
        let doc = json!({"a": 1});
        let path = PropertyPath::parse("");
        assert!(path.is_empty());
        assert_eq!(path.traverse(&doc).unwrap(), &doc);
    }

    #[test]
    fn test_empty_segment_addresses_empty_key() {
        let doc = json!({"": {"x": true}});
        let path = PropertyPath::parse(".x");
        assert_eq!(path.segments(), &["".to_string(), "x".to_string()]);
        assert_eq!(path.traverse(&doc).unwrap(), &json!(true));
    }

    #[test]
    fn test_nested_lookup_matches_manual_indexing() {
        let doc = json!({"a": {"b": {"c": [10, 20]}}});
        let path = PropertyPath::parse("a.b.c");
        assert_eq!(path.traverse(&doc).unwrap(), &doc["a"]["b"]["c"]);
    }

    #[test]
    fn test_array_index_segment() {
        let doc = json!({"items": [{"id": "x"}, {"id": "y"}]});
        let path = PropertyPath::parse("items.1.id");
        assert_eq!(path.traverse(&doc).unwrap(), &json!("y"));
    }

    #[test]
    fn test_missing_segment_is_reported() {
        let doc = json!({"a": {"b": {}}});
        let path = PropertyPath::parse("a.b.c");
        assert_eq!(path.traverse(&doc), Err("c"));
    }

    #[test]
    fn test_bad_array_indices() {
        let doc = json!([1, 2, 3]);
        assert_eq!(PropertyPath::parse("3").traverse(&doc), Err("3"));
        assert_eq!(PropertyPath::parse("-1").traverse(&doc), Err("-1"));
        assert_eq!(PropertyPath::parse("01").traverse(&doc), Err("01"));
        assert_eq!(PropertyPath::parse("+1").traverse(&doc), Err("+1"));
    }

    #[test]
    fn test_scalar_has_no_children() {
        let doc = json!({"a": "text"});
        assert_eq!(PropertyPath::parse("a.len").traverse(&doc), Err("len"));
    }

    #[test]
    fn test_display_round_trips_raw() {
        assert_eq!(PropertyPath::parse("a.b.c").to_string(), "a.b.c");
    }
}
