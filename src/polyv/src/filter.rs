//! Structure-preserving language filter.
//!
//! Rebuilds a document keeping its exact nested shape; the only things that
//! can disappear are ID-keyed dict entries and ID-shaped members of `"Ids"`
//! lists whose language the user did not allow. Every keep/drop decision is
//! recorded in a [`FileStats`] accumulator for the run report.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::document::is_id_key;

/// What to do with IDs whose language could not be resolved.
///
/// Detail documents keep them (untranslated content is assumed safe), while
/// the name/ID index drops them (the index should only reference classifiable
/// content). The asymmetry is intentional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownPolicy {
    Keep,
    Drop,
}

/// Per-file keep/drop tally, bucketed the way the report presents it.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FileStats {
    pub kept_allowed_ids: Vec<String>,
    pub kept_unknown_ids: Vec<String>,
    pub removed_disallowed_ids: Vec<String>,
    pub removed_unknown_ids: Vec<String>,
}

/// The derived counts serialized alongside the ID lists.
#[derive(Debug, Clone, Serialize)]
pub struct FileStatsCounts {
    pub kept_allowed: usize,
    pub kept_unknown: usize,
    pub removed_disallowed: usize,
    pub removed_unknown: usize,
}

impl FileStats {
    pub fn counts(&self) -> FileStatsCounts {
        FileStatsCounts {
            kept_allowed: self.kept_allowed_ids.len(),
            kept_unknown: self.kept_unknown_ids.len(),
            removed_disallowed: self.removed_disallowed_ids.len(),
            removed_unknown: self.removed_unknown_ids.len(),
        }
    }
}

/// The keep/drop decision for a single ID, shared by the dict-key and
/// Ids-list paths.
enum Decision {
    KeepAllowed,
    KeepUnknown,
    DropDisallowed,
    DropUnknown,
}

fn decide(
    id: &str,
    id_to_lang: &BTreeMap<String, String>,
    allowed: &BTreeSet<String>,
    policy: UnknownPolicy,
) -> Decision {
    match id_to_lang.get(id) {
        None => match policy {
            UnknownPolicy::Keep => Decision::KeepUnknown,
            UnknownPolicy::Drop => Decision::DropUnknown,
        },
        Some(lang) if allowed.contains(lang) => Decision::KeepAllowed,
        Some(_) => Decision::DropDisallowed,
    }
}

/// Rebuild `doc`, dropping disallowed IDs while copying everything else
/// verbatim.
///
/// Unknown-language IDs additionally land in `unknown_acc`, the
/// cross-document set reported once per run.
pub fn filter_by_language(
    doc: &Value,
    id_to_lang: &BTreeMap<String, String>,
    allowed: &BTreeSet<String>,
    policy: UnknownPolicy,
    stats: &mut FileStats,
    unknown_acc: &mut BTreeSet<String>,
) -> Value {
    match doc {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| {
                    filter_by_language(item, id_to_lang, allowed, policy, stats, unknown_acc)
                })
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                // "Ids" lists get per-item filtering; ID-shaped strings only.
                if key == "Ids" {
                    if let Value::Array(items) = value {
                        let filtered =
                            filter_ids_list(items, id_to_lang, allowed, policy, stats, unknown_acc);
                        out.insert(key.clone(), Value::Array(filtered));
                        continue;
                    }
                }

                if is_id_key(key) {
                    match decide(key, id_to_lang, allowed, policy) {
                        Decision::KeepAllowed => {
                            stats.kept_allowed_ids.push(key.clone());
                        }
                        Decision::KeepUnknown => {
                            stats.kept_unknown_ids.push(key.clone());
                            unknown_acc.insert(key.clone());
                        }
                        Decision::DropDisallowed => {
                            stats.removed_disallowed_ids.push(key.clone());
                            continue;
                        }
                        Decision::DropUnknown => {
                            stats.removed_unknown_ids.push(key.clone());
                            unknown_acc.insert(key.clone());
                            continue;
                        }
                    }
                }

                out.insert(
                    key.clone(),
                    filter_by_language(value, id_to_lang, allowed, policy, stats, unknown_acc),
                );
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn filter_ids_list(
    items: &[Value],
    id_to_lang: &BTreeMap<String, String>,
    allowed: &BTreeSet<String>,
    policy: UnknownPolicy,
    stats: &mut FileStats,
    unknown_acc: &mut BTreeSet<String>,
) -> Vec<Value> {
    let mut kept = Vec::new();
    for item in items {
        let Some(id) = item.as_str().filter(|s| is_id_key(s)) else {
            // Non-ID items pass through untouched.
            kept.push(item.clone());
            continue;
        };
        match decide(id, id_to_lang, allowed, policy) {
            Decision::KeepAllowed => {
                kept.push(item.clone());
                stats.kept_allowed_ids.push(id.to_string());
            }
            Decision::KeepUnknown => {
                kept.push(item.clone());
                stats.kept_unknown_ids.push(id.to_string());
                unknown_acc.insert(id.to_string());
            }
            Decision::DropDisallowed => {
                stats.removed_disallowed_ids.push(id.to_string());
            }
            Decision::DropUnknown => {
                stats.removed_unknown_ids.push(id.to_string());
                unknown_acc.insert(id.to_string());
            }
        }
    }
    kept
}
