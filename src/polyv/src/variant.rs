//! Per-entry variant field patching.
//!
//! Detail entries carry one pair of gendered text fields per language
//! (`<lang>_femaleVariant` / `<lang>_maleVariant`). The first non-empty
//! female variant without a pseudo-tag is the entry's reference text; every
//! other language's tagged fields are retargeted to it. A separate pass can
//! strip the "translation effect" by blanking the override text of tags in
//! selected languages.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::lang::LangTable;
use crate::tag;

pub const FEMALE_SUFFIX: &str = "_femaleVariant";
pub const MALE_SUFFIX: &str = "_maleVariant";

/// Field-prefix -> three-letter code mapping used when retargeting tags.
/// The variant field prefixes are the game's two-letter language markers.
pub fn variant_prefix_table() -> LangTable {
    LangTable::from_pairs([
        ("en", "eng"),
        ("pl", "pol"),
        ("br", "bra"),
        ("cn", "chin"),
        ("fr", "fra"),
        ("de", "deu"),
        ("it", "ita"),
        ("jp", "jpn"),
        ("kr", "kor"),
        ("ru", "rus"),
        ("es", "mex"),
    ])
}

/// Display-name / code pairs offered during translation-effect selection.
pub fn display_languages() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ENGLISH", "eng"),
        ("POLISH", "pol"),
        ("BRAZILIAN", "bra"),
        ("CHINESE", "chin"),
        ("FRENCH", "fra"),
        ("GERMAN", "deu"),
        ("ITALIAN", "ita"),
        ("JAPANESE", "jpn"),
        ("KOREAN", "kor"),
        ("RUSSIAN", "rus"),
        ("SPANISH", "mex"),
    ]
}

/// What a patch pass did to one entry.
#[derive(Debug, Default)]
pub struct PatchOutcome {
    pub changed_fields: usize,
    pub events: Vec<String>,
}

impl PatchOutcome {
    fn note(&mut self, msg: impl Into<String>) {
        self.events.push(msg.into());
    }

    pub fn changed(&self) -> bool {
        self.changed_fields > 0
    }
}

/// The reference text detected for an entry.
struct Reference {
    lang: String,
    female_text: String,
    male_text: String,
}

/// Language marker of a variant key: the text before the first underscore.
/// Sibling keys are rebuilt as `<marker>_femaleVariant` / `<marker>_maleVariant`,
/// so the marker and the lookups always agree, even for keys with extra
/// underscore segments.
fn key_prefix(key: &str) -> &str {
    key.split('_').next().unwrap_or(key)
}

/// Find the reference language: the first non-empty `_femaleVariant` whose
/// value is plain text (no tag). The male reference falls back to the female
/// text when the same-language male variant is empty or itself tagged.
fn find_reference(entry: &Map<String, Value>) -> Option<Reference> {
    for (key, value) in entry {
        if !key.ends_with(FEMALE_SUFFIX) {
            continue;
        }
        let lang = key_prefix(key);
        let Some(text) = value.as_str() else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() || tag::contains_tag(text) {
            continue;
        }

        let male_key = format!("{lang}{MALE_SUFFIX}");
        let male = entry
            .get(&male_key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        let male_text = if !male.is_empty() && !tag::contains_tag(male) {
            male.to_string()
        } else {
            text.to_string()
        };

        return Some(Reference {
            lang: lang.to_string(),
            female_text: text.to_string(),
            male_text,
        });
    }
    None
}

/// Retarget every tagged variant field of an entry to its reference text.
///
/// Tagged fields get their `l`/`o` attributes rewritten to the reference
/// language's code and text (female reference for female fields, male
/// reference for male fields). Empty male variants are synthesized from the
/// reference male text, borrowing the timing attribute from the sibling
/// female tag when it has one. Plain-text non-reference fields and entries
/// without any reference are left alone.
pub fn retag_entry(entry: &mut Map<String, Value>, table: &LangTable) -> PatchOutcome {
    let mut outcome = PatchOutcome::default();

    let Some(reference) = find_reference(entry) else {
        outcome.note("no reference language found; entry left unmodified");
        return outcome;
    };

    let target_code = table
        .normalize(&reference.lang)
        .map(str::to_string)
        .unwrap_or_else(|| reference.lang.to_lowercase());
    outcome.note(format!(
        "reference language: {} => {}",
        reference.lang, target_code
    ));

    let keys: Vec<String> = entry.keys().cloned().collect();
    for key in keys {
        let is_female = key.ends_with(FEMALE_SUFFIX);
        let is_male = key.ends_with(MALE_SUFFIX);
        if !is_female && !is_male {
            continue;
        }

        let prefix = key_prefix(&key);
        if prefix == reference.lang {
            outcome.note(format!("{key}: reference field, not modified"));
            continue;
        }

        let Some(value) = entry.get(&key).and_then(Value::as_str).map(str::to_string) else {
            outcome.note(format!("{key}: non-string value, skipped"));
            continue;
        };

        if !value.trim().is_empty() {
            if tag::contains_tag(&value) {
                let new_o = if is_female {
                    reference.female_text.as_str()
                } else if !reference.male_text.trim().is_empty() {
                    reference.male_text.as_str()
                } else {
                    reference.female_text.as_str()
                };
                let updated = tag::set_lang_and_override(&value, &target_code, new_o);
                entry.insert(key.clone(), Value::String(updated));
                outcome.changed_fields += 1;
                outcome.note(format!("{key}: rewrote 'l' and 'o' attributes"));
            } else {
                outcome.note(format!("{key}: plain text, presumed reference; not modified"));
            }
        } else if is_male {
            if reference.male_text.trim().is_empty() {
                outcome.note(format!("{key}: empty and no reference male text; not modified"));
                continue;
            }
            // Borrow timing from the sibling female tag when available.
            let female_key = format!("{prefix}{FEMALE_SUFFIX}");
            let timing = entry
                .get(&female_key)
                .and_then(Value::as_str)
                .filter(|v| tag::contains_tag(v))
                .and_then(tag::timing_attr)
                .filter(|t| !t.is_empty())
                .unwrap_or(&reference.female_text)
                .to_string();
            let new_tag = tag::make_tag(&target_code, &reference.male_text, &timing);
            entry.insert(key.clone(), Value::String(new_tag));
            outcome.changed_fields += 1;
            outcome.note(format!("{key}: synthesized tag for empty field"));
        }
    }

    outcome
}

/// Blank the translation-effect override for entries in the selected
/// languages.
///
/// Only entries whose top-level `"Language"` is in `selected` are touched,
/// and only variant fields carrying a tag with the matching `l="<language>"`
/// marker; the first `o="..."` occurrence becomes `o=" "`.
pub fn strip_translation_effect(
    entry: &mut Map<String, Value>,
    selected: &BTreeSet<String>,
) -> PatchOutcome {
    let mut outcome = PatchOutcome::default();

    let Some(language) = entry.get("Language").and_then(Value::as_str).map(str::to_string)
    else {
        return outcome;
    };
    if !selected.contains(&language) {
        return outcome;
    }

    let marker = format!(r#"l="{language}""#);
    let keys: Vec<String> = entry.keys().cloned().collect();
    for key in keys {
        if !key.ends_with(FEMALE_SUFFIX) && !key.ends_with(MALE_SUFFIX) {
            continue;
        }
        let Some(value) = entry.get(&key).and_then(Value::as_str) else {
            continue;
        };
        if !tag::contains_tag(value) || !value.contains(&marker) {
            continue;
        }
        if let Some(blanked) = tag::blank_override(value) {
            entry.insert(key.clone(), Value::String(blanked));
            outcome.changed_fields += 1;
            outcome.note(format!("{key}: blanked translation-effect override"));
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{LangTable, LanguageConfig, LanguageSpec};
    use serde_json::json;

    fn entry_from(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_retag_rewrites_l_and_o() {
        // Spanish plain text establishes the reference; the config resolves
        // the "es" prefix to the code "es".
        let config = LanguageConfig {
            languages: vec![LanguageSpec {
                code: "es".into(),
                aliases: vec!["spa".into(), "spanish".into()],
                prompt: None,
            }],
        };
        let table = LangTable::from_config(&config);

        let mut entry = entry_from(json!({
            "es_femaleVariant": "hello",
            "jp_femaleVariant": r#"<kiroshi l="oldlang" o="oldtext" t="x" b="" a=""/>"#
        }));

        let outcome = retag_entry(&mut entry, &table);
        assert_eq!(outcome.changed_fields, 1);

        let jp = entry["jp_femaleVariant"].as_str().unwrap();
        assert!(jp.contains(r#"l="es""#));
        assert!(jp.contains(r#"o="hello""#));
        assert!(jp.contains(r#"t="x""#));
    }

    #[test]
    fn test_retag_with_builtin_prefix_table() {
        let table = variant_prefix_table();
        let mut entry = entry_from(json!({
            "es_femaleVariant": "hola",
            "en_femaleVariant": r#"<kiroshi l="zzz" o="zzz" t="1" b="" a=""/>"#
        }));

        retag_entry(&mut entry, &table);
        assert!(entry["en_femaleVariant"].as_str().unwrap().contains(r#"l="mex""#));
    }

    #[test]
    fn test_retag_male_uses_male_reference() {
        let table = variant_prefix_table();
        let mut entry = entry_from(json!({
            "fr_femaleVariant": "bonjour",
            "fr_maleVariant": "salut",
            "jp_maleVariant": r#"<kiroshi l="x" o="y" t="z" b="" a=""/>"#
        }));

        retag_entry(&mut entry, &table);
        let jp = entry["jp_maleVariant"].as_str().unwrap();
        assert!(jp.contains(r#"l="fra""#));
        assert!(jp.contains(r#"o="salut""#));
    }

    #[test]
    fn test_retag_synthesizes_empty_male() {
        let table = variant_prefix_table();
        let mut entry = entry_from(json!({
            "fr_femaleVariant": "bonjour",
            "jp_femaleVariant": r#"<kiroshi l="x" o="y" t="2.5" b="" a=""/>"#,
            "jp_maleVariant": ""
        }));

        retag_entry(&mut entry, &table);
        // Timing borrowed from the sibling female tag.
        assert_eq!(
            entry["jp_maleVariant"].as_str().unwrap(),
            r#"<kiroshi l="fra" o="bonjour" t="2.5" b="" a=""/>"#
        );
    }

    #[test]
    fn test_retag_synthesized_timing_falls_back_to_reference_text() {
        let table = variant_prefix_table();
        let mut entry = entry_from(json!({
            "fr_femaleVariant": "bonjour",
            "jp_maleVariant": ""
        }));

        retag_entry(&mut entry, &table);
        assert_eq!(
            entry["jp_maleVariant"].as_str().unwrap(),
            r#"<kiroshi l="fra" o="bonjour" t="bonjour" b="" a=""/>"#
        );
    }

    #[test]
    fn test_retag_no_reference_leaves_entry_alone() {
        let table = variant_prefix_table();
        let original = json!({
            "en_femaleVariant": r#"<kiroshi l="a" o="b" t="c" b="" a=""/>"#,
            "en_maleVariant": ""
        });
        let mut entry = entry_from(original.clone());

        let outcome = retag_entry(&mut entry, &table);
        assert!(!outcome.changed());
        assert_eq!(Value::Object(entry), original);
    }

    #[test]
    fn test_retag_skips_reference_field_even_when_tagged() {
        let table = variant_prefix_table();
        let mut entry = entry_from(json!({
            "es_femaleVariant": "hola",
            "es_maleVariant": r#"<kiroshi l="keep" o="keep" t="k" b="" a=""/>"#
        }));

        retag_entry(&mut entry, &table);
        assert!(entry["es_maleVariant"].as_str().unwrap().contains(r#"l="keep""#));
    }

    #[test]
    fn test_prefix_is_first_underscore_segment() {
        let table = variant_prefix_table();
        // Extra underscore segments do not extend the marker: the reference
        // here is "es", and "es_maleVariant" counts as its reference sibling.
        let mut entry = entry_from(json!({
            "es_x_femaleVariant": "hola",
            "es_maleVariant": ""
        }));

        let outcome = retag_entry(&mut entry, &table);
        assert!(!outcome.changed());
        assert_eq!(entry["es_maleVariant"], "");
    }

    #[test]
    fn test_strip_only_selected_language() {
        let selected: BTreeSet<String> = ["eng".to_string()].into_iter().collect();

        let mut eng = entry_from(json!({
            "Language": "eng",
            "en_femaleVariant": r#"<kiroshi l="eng" o="line" t="x" b="" a=""/>"#,
            "jp_femaleVariant": r#"<kiroshi l="jpn" o="line" t="x" b="" a=""/>"#
        }));
        let outcome = strip_translation_effect(&mut eng, &selected);
        assert_eq!(outcome.changed_fields, 1);
        assert!(eng["en_femaleVariant"].as_str().unwrap().contains(r#"o=" ""#));
        assert!(eng["jp_femaleVariant"].as_str().unwrap().contains(r#"o="line""#));

        let mut kor = entry_from(json!({
            "Language": "kor",
            "kr_femaleVariant": r#"<kiroshi l="kor" o="line" t="x" b="" a=""/>"#
        }));
        let outcome = strip_translation_effect(&mut kor, &selected);
        assert!(!outcome.changed());
    }
}
