//! Field Flattener — maps a resume snapshot to `field path → normalized text`.
//!
//! Path scheme:
//! - `personal` section: `<key>.<field>`, or `<key>.<n>` (0-based) when the content is an array
//! - `text` section:     `<key>`
//! - `list` section:     `<key>[i].<field>` (1-based, `id` skipped) or `<key>[i]` for scalar items;
//!                       array items use `<key>[i].<n>`
//! - anything else:      generic walk, `<prefix>.<key>` for objects, `<prefix>[i]` for arrays
//!
//! Flattening never fails. Unparseable or oddly shaped input yields a smaller map.

use serde_json::{Map, Value};
use tracing::warn;

use crate::history::models::FieldMap;
use crate::history::normalize::to_comparable_string;

/// Nesting beyond this depth is ignored by the generic walk.
pub const MAX_FLATTEN_DEPTH: usize = 64;

static NULL: Value = Value::Null;

/// Interpretation of one section's `content`, decided once from its `type`.
#[derive(Debug)]
pub enum SectionBody<'a> {
    /// Object or array content; see [`entries`].
    Personal(&'a Value),
    Text(&'a Value),
    List(&'a [Value]),
    Generic(&'a Value),
}

impl<'a> SectionBody<'a> {
    pub fn classify(section: &'a Map<String, Value>) -> Self {
        let content = section.get("content").unwrap_or(&NULL);
        let kind = section.get("type").and_then(Value::as_str);
        match (kind, content) {
            (Some("personal"), Value::Object(_) | Value::Array(_)) => SectionBody::Personal(content),
            (Some("text"), _) => SectionBody::Text(content),
            (Some("list"), Value::Array(items)) => SectionBody::List(items.as_slice()),
            _ => SectionBody::Generic(content),
        }
    }
}

/// Parses version content. JSON strings are decoded; anything that fails
/// to decode becomes an empty object.
pub fn parse_content(content: &Value) -> Value {
    match content {
        Value::Null => Value::Object(Map::new()),
        Value::String(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!("Version content is not valid JSON, treating as empty: {e}");
            Value::Object(Map::new())
        }),
        other => other.clone(),
    }
}

/// Flattens one snapshot (JSON string or tree) into a [`FieldMap`].
pub fn flatten_resume_fields(snapshot: &Value) -> FieldMap {
    let content = parse_content(snapshot);
    let mut output = FieldMap::new();

    match &content {
        Value::Object(root) => match root.get("sections") {
            Some(Value::Array(sections)) => {
                for (index, section) in sections.iter().enumerate() {
                    if let Value::Object(section) = section {
                        flatten_section(section, index, &mut output);
                    }
                }
            }
            _ => flatten_generic(&content, "", 0, &mut output),
        },
        Value::Array(_) => flatten_generic(&content, "", 0, &mut output),
        _ => {}
    }

    output
}

/// Section key: `id`, else `title`, else `section-<n>`; whitespace runs
/// become `_`, then lower-cased.
pub fn section_key(section: &Map<String, Value>, index: usize) -> String {
    let raw = ["id", "title"]
        .iter()
        .find_map(|name| section.get(*name).and_then(key_text))
        .unwrap_or_else(|| format!("section-{}", index + 1));

    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// A usable key component: a non-empty string, a non-zero number or `true`.
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(to_comparable_string(value)),
        _ => None,
    }
}

fn flatten_section(section: &Map<String, Value>, index: usize, output: &mut FieldMap) {
    let key = section_key(section, index);

    match SectionBody::classify(section) {
        SectionBody::Personal(content) => {
            for (field, value) in entries(content) {
                insert_normalized(output, format!("{key}.{field}"), value);
            }
        }
        SectionBody::Text(content) => insert_normalized(output, key, content),
        SectionBody::List(items) => {
            for (i, item) in items.iter().enumerate() {
                let item_prefix = format!("{key}[{}]", i + 1);
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        for (field, value) in entries(item).into_iter().filter(|(f, _)| f != "id") {
                            insert_normalized(output, format!("{item_prefix}.{field}"), value);
                        }
                    }
                    scalar => insert_normalized(output, item_prefix, scalar),
                }
            }
        }
        SectionBody::Generic(content) => flatten_generic(content, &key, 0, output),
    }
}

/// Field/value pairs of an object, or 0-based index/item pairs of an array.
fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(fields) => fields.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn insert_normalized(output: &mut FieldMap, path: String, value: &Value) {
    let normalized = to_comparable_string(value);
    if !normalized.is_empty() {
        output.insert(path, normalized);
    }
}

fn flatten_generic(value: &Value, prefix: &str, depth: usize, output: &mut FieldMap) {
    if depth > MAX_FLATTEN_DEPTH {
        warn!("Snapshot nesting exceeds {MAX_FLATTEN_DEPTH} levels at '{prefix}', truncating");
        return;
    }

    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_generic(item, &format!("{prefix}[{}]", i + 1), depth + 1, output);
            }
        }
        Value::Object(fields) => {
            for (field, nested) in fields {
                let next = if prefix.is_empty() {
                    field.clone()
                } else {
                    format!("{prefix}.{field}")
                };
                flatten_generic(nested, &next, depth + 1, output);
            }
        }
        leaf => {
            if !prefix.is_empty() {
                insert_normalized(output, prefix.to_string(), leaf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_personal_and_text_sections() {
        let snapshot = json!({
            "sections": [
                {"id": "personal", "type": "personal", "content": {"name": "Alex"}},
                {"id": "summary", "type": "text", "content": "<p>Hi</p>"}
            ]
        });
        assert_eq!(
            flatten_resume_fields(&snapshot),
            map(&[("personal.name", "Alex"), ("summary", "Hi")])
        );
    }

    #[test]
    fn test_list_items_skip_id_and_empty_fields() {
        let snapshot = json!({
            "sections": [{
                "id": "exp",
                "type": "list",
                "content": [
                    {"id": "e1", "title": "Engineer", "company": "  ", "years": 3},
                    "Volunteer",
                    null
                ]
            }]
        });
        assert_eq!(
            flatten_resume_fields(&snapshot),
            map(&[
                ("exp[1].title", "Engineer"),
                ("exp[1].years", "3"),
                ("exp[2]", "Volunteer"),
            ])
        );
    }

    #[test]
    fn test_section_key_fallbacks() {
        let by_title = json!({"title": "Work  History\tNow"});
        let by_index = json!({"id": "", "title": ""});
        assert_eq!(section_key(by_title.as_object().unwrap(), 0), "work_history_now");
        assert_eq!(section_key(by_index.as_object().unwrap(), 2), "section-3");
    }

    #[test]
    fn test_personal_array_content_uses_entry_indices() {
        let snapshot = json!({
            "sections": [{"id": "contact", "type": "personal", "content": ["a@b.dev", "", "555"]}]
        });
        assert_eq!(
            flatten_resume_fields(&snapshot),
            map(&[("contact.0", "a@b.dev"), ("contact.2", "555")])
        );
    }

    #[test]
    fn test_list_array_items_use_entry_indices() {
        let snapshot = json!({
            "sections": [{"id": "pairs", "type": "list", "content": [["Rust", "Go"]]}]
        });
        assert_eq!(
            flatten_resume_fields(&snapshot),
            map(&[("pairs[1].0", "Rust"), ("pairs[1].1", "Go")])
        );
    }

    #[test]
    fn test_boolean_true_id_is_a_key() {
        let truthy = json!({"id": true, "title": "Ignored"});
        let falsy = json!({"id": false, "title": "Skills"});
        assert_eq!(section_key(truthy.as_object().unwrap(), 0), "true");
        assert_eq!(section_key(falsy.as_object().unwrap(), 0), "skills");
    }

    #[test]
    fn test_unknown_section_type_flattens_generically() {
        let snapshot = json!({
            "sections": [{
                "id": "Extra Info",
                "type": "custom",
                "content": {"links": ["a.dev", {"label": "gh"}], "note": ""}
            }]
        });
        assert_eq!(
            flatten_resume_fields(&snapshot),
            map(&[("extra_info.links[1]", "a.dev"), ("extra_info.links[2].label", "gh")])
        );
    }

    #[test]
    fn test_list_type_with_non_array_content_is_generic() {
        let snapshot = json!({
            "sections": [{"id": "skills", "type": "list", "content": {"top": "Rust"}}]
        });
        assert_eq!(flatten_resume_fields(&snapshot), map(&[("skills.top", "Rust")]));
    }

    #[test]
    fn test_snapshot_without_sections_is_generic() {
        let snapshot = json!({"name": "Alex", "tags": ["a", "b"], "meta": {"v": 2}});
        assert_eq!(
            flatten_resume_fields(&snapshot),
            map(&[("meta.v", "2"), ("name", "Alex"), ("tags[1]", "a"), ("tags[2]", "b")])
        );
    }

    #[test]
    fn test_json_string_content_is_parsed() {
        let raw = Value::String(r#"{"sections":[{"id":"s","type":"text","content":"x"}]}"#.into());
        assert_eq!(flatten_resume_fields(&raw), map(&[("s", "x")]));
    }

    #[test]
    fn test_invalid_json_flattens_to_empty() {
        let raw = Value::String("{not json".into());
        assert!(flatten_resume_fields(&raw).is_empty());
    }

    #[test]
    fn test_malformed_shapes_degrade_quietly() {
        assert!(flatten_resume_fields(&Value::Null).is_empty());
        assert!(flatten_resume_fields(&json!(5)).is_empty());
        assert!(flatten_resume_fields(&json!({"sections": [1, null, "x"]})).is_empty());
        // non-array `sections` falls back to a generic walk of the root
        assert_eq!(
            flatten_resume_fields(&json!({"sections": "oops"})),
            map(&[("sections", "oops")])
        );
    }

    #[test]
    fn test_flatten_is_deterministic_and_has_no_blank_values() {
        let snapshot = json!({
            "sections": [
                {"id": "p", "type": "personal", "content": {"b": " ", "a": "x", "c": null}},
                {"id": "t", "type": "text", "content": "<p>  </p>"}
            ]
        });
        let first = flatten_resume_fields(&snapshot);
        let second = flatten_resume_fields(&snapshot);
        assert_eq!(first, second);
        assert!(first.values().all(|v| !v.trim().is_empty()));
        assert_eq!(first, map(&[("p.a", "x")]));
    }

    #[test]
    fn test_deep_nesting_is_truncated() {
        let mut value = json!("leaf");
        for _ in 0..(MAX_FLATTEN_DEPTH + 10) {
            value = json!({ "n": value });
        }
        assert!(flatten_resume_fields(&value).is_empty());
    }
}
