//! Gendered field swapping for voice-reassignment packs.
//!
//! Swaps the paired duration, resource-path, and per-language variant fields
//! of each entry. An empty male variant is backfilled from the female variant
//! before the swap, so a one-sided pair never ends up with the content on
//! neither side. The backfill makes the operation non-idempotent on such
//! pairs; that ordering is long-standing behavior and is pinned by test.

use serde_json::{Map, Value};

use crate::document::is_id_key;
use crate::variant::{PatchOutcome, FEMALE_SUFFIX, MALE_SUFFIX};

const LENGTH_PAIR: (&str, &str) = ("translated_femaleLength", "translated_maleLength");
const RES_PATH_PAIR: (&str, &str) = ("femaleResPath$value", "maleResPath$value");

/// Which entries of a document the swap applies to.
#[derive(Debug, Clone)]
pub enum SwapScope {
    /// Every ID-keyed entry.
    AllIds,
    /// Only entries whose `"NPC"` field starts with the given prefix.
    NpcPrefix(String),
}

impl SwapScope {
    fn includes(&self, entry: &Map<String, Value>) -> bool {
        match self {
            SwapScope::AllIds => true,
            SwapScope::NpcPrefix(prefix) => entry
                .get("NPC")
                .and_then(Value::as_str)
                .is_some_and(|npc| npc.starts_with(prefix.as_str())),
        }
    }
}

/// Totals for one document pass.
#[derive(Debug, Default)]
pub struct SwapSummary {
    pub processed: usize,
    pub skipped: usize,
    pub events: Vec<String>,
}

fn swap_pair(entry: &mut Map<String, Value>, a: &str, b: &str, outcome: &mut PatchOutcome) {
    if entry.contains_key(a) && entry.contains_key(b) {
        let va = entry[a].clone();
        let vb = entry[b].clone();
        entry.insert(a.to_string(), vb);
        entry.insert(b.to_string(), va);
        outcome.changed_fields += 2;
        outcome.events.push(format!("swapped {a} <-> {b}"));
    } else {
        outcome.events.push(format!("missing {a} and/or {b}; no swap"));
    }
}

/// Swap the gendered fields of one entry.
///
/// Order matters: an empty male variant is first backfilled with the female
/// variant's current content, then the pair is swapped. A pair that starts as
/// (`"bonjour"`, `""`) therefore ends with both sides holding `"bonjour"`.
pub fn swap_entry(entry: &mut Map<String, Value>) -> PatchOutcome {
    let mut outcome = PatchOutcome::default();

    swap_pair(entry, LENGTH_PAIR.0, LENGTH_PAIR.1, &mut outcome);
    swap_pair(entry, RES_PATH_PAIR.0, RES_PATH_PAIR.1, &mut outcome);

    let female_keys: Vec<String> = entry
        .keys()
        .filter(|k| k.ends_with(FEMALE_SUFFIX))
        .cloned()
        .collect();

    for female_key in female_keys {
        let lang = female_key
            .strip_suffix(FEMALE_SUFFIX)
            .unwrap_or(&female_key)
            .to_string();
        let male_key = format!("{lang}{MALE_SUFFIX}");
        if !entry.contains_key(&male_key) {
            outcome.events.push(format!("[{lang}] missing {male_key}; no swap"));
            continue;
        }

        // Backfill an empty male variant from the female variant before the
        // swap, using the pre-backfill female value.
        let male_is_empty = entry[&male_key]
            .as_str()
            .is_some_and(|m| m.trim().is_empty());
        if male_is_empty {
            let female_value = entry[&female_key].clone();
            entry.insert(male_key.clone(), female_value);
            outcome.events.push(format!("[{lang}] backfilled empty {male_key}"));
        }

        swap_pair(entry, &female_key, &male_key, &mut outcome);
    }

    outcome
}

/// Apply [`swap_entry`] to every in-scope ID-keyed entry of a document.
pub fn swap_document(doc: &mut Value, scope: &SwapScope) -> SwapSummary {
    let mut summary = SwapSummary::default();

    let Some(map) = doc.as_object_mut() else {
        return summary;
    };

    for (id, payload) in map.iter_mut() {
        if !is_id_key(id) {
            continue;
        }
        let Some(entry) = payload.as_object_mut() else {
            summary.skipped += 1;
            summary.events.push(format!("{id}: malformed entry, skipped"));
            continue;
        };
        if !scope.includes(entry) {
            summary.skipped += 1;
            summary.events.push(format!("{id}: out of scope, skipped"));
            continue;
        }

        summary.processed += 1;
        summary.events.push(format!("{id}: processing"));
        let outcome = swap_entry(entry);
        summary
            .events
            .extend(outcome.events.into_iter().map(|e| format!("    {e}")));
    }

    summary
}

/// Render a field as text for annotation: strings as-is, anything else in its
/// JSON form, so a non-string value keeps its content through the suffixing.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Mark the npc-info document's `"V"` record as voice-reassigned: the
/// language gains a `_transV` suffix and the description gains ` (MtF&FtM)`.
/// Returns false when the document lacks the expected `"V"` object.
pub fn annotate_npc_info(doc: &mut Value) -> bool {
    let Some(v) = doc.get_mut("V").and_then(Value::as_object_mut) else {
        return false;
    };

    let language = v.get("language").map(text_of).unwrap_or_default();
    let description = v.get("description").map(text_of).unwrap_or_default();

    v.insert("language".to_string(), Value::String(format!("{language}_transV")));
    v.insert(
        "description".to_string(),
        Value::String(format!("{description} (MtF&FtM)")),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_from(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_swap_lengths_and_paths() {
        let mut entry = entry_from(json!({
            "translated_femaleLength": 1.5,
            "translated_maleLength": 2.5,
            "femaleResPath$value": "f.wem",
            "maleResPath$value": "m.wem"
        }));

        swap_entry(&mut entry);

        assert_eq!(entry["translated_femaleLength"], json!(2.5));
        assert_eq!(entry["translated_maleLength"], json!(1.5));
        assert_eq!(entry["femaleResPath$value"], "m.wem");
        assert_eq!(entry["maleResPath$value"], "f.wem");
    }

    #[test]
    fn test_swap_variants_both_present() {
        let mut entry = entry_from(json!({
            "fr_femaleVariant": "bonjour",
            "fr_maleVariant": "salut"
        }));

        swap_entry(&mut entry);

        assert_eq!(entry["fr_femaleVariant"], "salut");
        assert_eq!(entry["fr_maleVariant"], "bonjour");
    }

    // Literal trace of the backfill-then-swap ordering: backfill copies the
    // female text into the empty male slot, then the swap exchanges the two
    // now-equal values, so both sides end up with the female text.
    #[test]
    fn test_backfill_then_swap_literal_trace() {
        let mut entry = entry_from(json!({
            "fr_femaleVariant": "bonjour",
            "fr_maleVariant": ""
        }));

        swap_entry(&mut entry);

        assert_eq!(entry["fr_femaleVariant"], "bonjour");
        assert_eq!(entry["fr_maleVariant"], "bonjour");
    }

    // Pins the non-idempotence: after a backfill, a second run no longer
    // restores the original one-sided pair.
    #[test]
    fn test_swap_twice_not_identity_after_backfill() {
        let original = json!({
            "fr_femaleVariant": "bonjour",
            "fr_maleVariant": ""
        });
        let mut entry = entry_from(original.clone());

        swap_entry(&mut entry);
        swap_entry(&mut entry);

        assert_ne!(Value::Object(entry.clone()), original);
        assert_eq!(entry["fr_maleVariant"], "bonjour");
    }

    #[test]
    fn test_swap_twice_is_identity_without_backfill() {
        let original = json!({
            "translated_femaleLength": 1.0,
            "translated_maleLength": 2.0,
            "de_femaleVariant": "hallo",
            "de_maleVariant": "moin"
        });
        let mut entry = entry_from(original.clone());

        swap_entry(&mut entry);
        swap_entry(&mut entry);

        assert_eq!(Value::Object(entry), original);
    }

    #[test]
    fn test_scope_npc_prefix() {
        let mut doc = json!({
            "100": {"NPC": "PolyglotV_es", "fr_femaleVariant": "a", "fr_maleVariant": "b"},
            "200": {"NPC": "Guard", "fr_femaleVariant": "c", "fr_maleVariant": "d"},
            "meta": {"not": "an id"}
        });

        let summary = swap_document(&mut doc, &SwapScope::NpcPrefix("PolyglotV_".into()));

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(doc["100"]["fr_femaleVariant"], "b");
        assert_eq!(doc["200"]["fr_femaleVariant"], "c");
    }

    #[test]
    fn test_annotate_npc_info() {
        let mut doc = json!({
            "V": {"language": "spanish", "description": "Voiced V"}
        });

        assert!(annotate_npc_info(&mut doc));
        assert_eq!(doc["V"]["language"], "spanish_transV");
        assert_eq!(doc["V"]["description"], "Voiced V (MtF&FtM)");

        let mut missing = json!({"other": {}});
        assert!(!annotate_npc_info(&mut missing));
    }

    #[test]
    fn test_annotate_npc_info_stringifies_non_string_fields() {
        let mut doc = json!({
            "V": {"language": 42, "description": "Voiced V"}
        });

        assert!(annotate_npc_info(&mut doc));
        assert_eq!(doc["V"]["language"], "42_transV");
        assert_eq!(doc["V"]["description"], "Voiced V (MtF&FtM)");
    }
}
