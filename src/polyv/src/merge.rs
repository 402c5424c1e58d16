//! Merge policies for combining a curated base dataset with an extension
//! dataset.
//!
//! Two shapes, two policies:
//! - ID -> detail-record documents use a shallow key union where the base
//!   always wins on shared keys.
//! - Name -> `{"Ids": [...]}` index documents use a union keyed by a global
//!   ID namespace, so an ID already claimed anywhere in the base can never be
//!   re-attached to another name by the extension.

use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// One decision taken while merging, suitable for the persisted merge log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    /// A key only the extra document had was added.
    Added { key: String },
    /// A shared key kept the base document's value.
    KeptBase { key: String },
    /// IDs were appended to an existing name's list.
    AppendedIds { name: String, ids: Vec<String> },
    /// A name absent from the base was created with these IDs.
    CreatedName { name: String, ids: Vec<String> },
    /// An extra entry had an unexpected shape and was skipped.
    SkippedMalformed { name: String },
}

impl fmt::Display for MergeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeEvent::Added { key } => write!(f, "ID {key}: added new data from extra source."),
            MergeEvent::KeptBase { key } => {
                write!(f, "ID {key}: kept base data, ignored extra source.")
            }
            MergeEvent::AppendedIds { name, ids } => {
                write!(f, "{name}: appended {} new ID(s): {}", ids.len(), ids.join(", "))
            }
            MergeEvent::CreatedName { name, ids } => {
                write!(f, "{name}: created with {} ID(s): {}", ids.len(), ids.join(", "))
            }
            MergeEvent::SkippedMalformed { name } => {
                write!(f, "{name}: skipped malformed entry (expected an object payload).")
            }
        }
    }
}

/// Shallow key union with priority to `base`.
///
/// Keys only `extra` has are inserted; shared keys keep the base value
/// unchanged. Non-object inputs are returned unmodified. Idempotent: merging
/// the same `extra` twice changes nothing further.
pub fn merge_keep_base(base: Value, extra: &Value) -> (Value, Vec<MergeEvent>) {
    let mut events = Vec::new();

    let Some(extra_map) = extra.as_object() else {
        return (base, events);
    };
    let mut base_map = match base {
        Value::Object(map) => map,
        other => return (other, events),
    };

    for (key, value) in extra_map {
        if base_map.contains_key(key) {
            events.push(MergeEvent::KeptBase { key: key.clone() });
        } else {
            base_map.insert(key.clone(), value.clone());
            events.push(MergeEvent::Added { key: key.clone() });
        }
    }

    (Value::Object(base_map), events)
}

/// Union by global ID for the Name -> `{"Ids": [...]}` shape.
///
/// The present-set is computed over every `Ids` list in `base`, not per name,
/// so the base keeps precedence for shared IDs even when the two documents
/// attach them to different names. Names created for the extension carry only
/// their new `Ids` list; any other payload fields the extra entry had are
/// dropped (long-standing behavior, pinned by test).
pub fn merge_id_lists_union(base: Value, extra: &Value) -> (Value, Vec<MergeEvent>) {
    let mut events = Vec::new();

    let Some(extra_map) = extra.as_object() else {
        return (base, events);
    };
    let mut base_map = match base {
        Value::Object(map) => map,
        other => return (other, events),
    };

    let mut present: BTreeSet<String> = BTreeSet::new();
    for payload in base_map.values() {
        for id in payload_ids(payload) {
            present.insert(id);
        }
    }

    for (name, payload) in extra_map {
        if !payload.is_object() {
            events.push(MergeEvent::SkippedMalformed { name: name.clone() });
            continue;
        }

        let to_add: Vec<String> = payload_ids(payload)
            .into_iter()
            .filter(|id| !present.contains(id))
            .collect();
        if to_add.is_empty() {
            continue;
        }

        match base_map.get_mut(name) {
            Some(Value::Object(existing)) => {
                let ids = existing
                    .entry("Ids")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(list) = ids {
                    let mut seen_local: BTreeSet<String> = list
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect();
                    for id in &to_add {
                        if seen_local.insert(id.clone()) {
                            list.push(Value::String(id.clone()));
                        }
                    }
                }
                events.push(MergeEvent::AppendedIds {
                    name: name.clone(),
                    ids: to_add.clone(),
                });
            }
            _ => {
                let mut new_payload = serde_json::Map::new();
                new_payload.insert(
                    "Ids".to_string(),
                    Value::Array(to_add.iter().cloned().map(Value::String).collect()),
                );
                base_map.insert(name.clone(), Value::Object(new_payload));
                events.push(MergeEvent::CreatedName {
                    name: name.clone(),
                    ids: to_add.clone(),
                });
            }
        }

        present.extend(to_add);
    }

    (Value::Object(base_map), events)
}

/// The string IDs inside an entry's `Ids` list, in list order.
fn payload_ids(payload: &Value) -> Vec<String> {
    let Some(Value::Array(list)) = payload.get("Ids") else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
