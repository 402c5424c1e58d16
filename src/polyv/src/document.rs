//! JSON document loading, saving, and ID inventory.
//!
//! All manifest files are UTF-8 JSON, pretty-printed for human diffability,
//! with non-ASCII characters preserved literally. Key order is preserved on
//! round-trip unless the caller asks for sorted keys.

use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a JSON document from disk.
pub fn load_json(path: &Path) -> Result<Value, DocumentError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Write a JSON document, creating parent directories as needed.
///
/// `sort_keys` recursively sorts every object's keys; otherwise the
/// document's own key order is kept.
pub fn write_json(path: &Path, data: &Value, sort_keys: bool) -> Result<(), DocumentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let rendered = if sort_keys {
        serde_json::to_string_pretty(&sorted_keys(data))?
    } else {
        serde_json::to_string_pretty(data)?
    };

    fs::write(path, rendered + "\n")?;
    Ok(())
}

/// Rebuild a value with every object's keys in lexicographic order.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                out.insert(k.clone(), sorted_keys(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

/// An ID key is a non-empty string of ASCII digits.
pub fn is_id_key(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Collect every ID-shaped string in a document: dict keys that look like
/// IDs, plus items inside any `"Ids": [...]` list, at any depth.
pub fn collect_ids(doc: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    walk_ids(doc, &mut found);
    found
}

fn walk_ids(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if is_id_key(key) {
                    found.insert(key.clone());
                }
                if key == "Ids" {
                    if let Value::Array(items) = child {
                        for item in items {
                            if let Value::String(s) = item {
                                if is_id_key(s) {
                                    found.insert(s.clone());
                                }
                            }
                        }
                    }
                }
                walk_ids(child, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_ids(item, found);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_id_key() {
        assert!(is_id_key("12345"));
        assert!(is_id_key("0"));
        assert!(!is_id_key(""));
        assert!(!is_id_key("12a45"));
        assert!(!is_id_key("V"));
        assert!(!is_id_key("١٢٣")); // non-ASCII digits don't count
    }

    #[test]
    fn test_collect_ids_keys_and_lists() {
        let doc = json!({
            "100": {"Language": "jpn"},
            "NPC_A": {"Ids": ["200", "300", "not-an-id"], "other": 1},
            "nested": {"deeper": {"400": {}}}
        });

        let ids = collect_ids(&doc);
        let expected: BTreeSet<String> =
            ["100", "200", "300", "400"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_write_json_roundtrip_preserves_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out.json");

        let doc = json!({"zeta": 1, "alpha": {"b": 2, "a": 3}});
        write_json(&path, &doc, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());

        let reloaded = load_json(&path).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_write_json_sort_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sorted.json");

        let doc = json!({"zeta": 1, "alpha": {"b": 2, "a": 3}});
        write_json(&path, &doc, true).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("alpha").unwrap() < text.find("zeta").unwrap());
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
    }

    #[test]
    fn test_write_json_preserves_non_ascii() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("utf8.json");

        let doc = json!({"greeting": "こんにちは"});
        write_json(&path, &doc, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("こんにちは"));
        assert!(!text.contains("\\u"));
    }
}
