//! Language configuration and per-ID language resolution.
//!
//! Languages are config-driven: each entry has a canonical code, a list of
//! aliases, and the prompt shown when asking the user to opt in. The config
//! file is optional; a built-in jpn/mex pair is used when it is missing or
//! unusable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::document::is_id_key;

/// One configured language: canonical code, accepted aliases, and the
/// question asked during interactive selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSpec {
    pub code: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl LanguageSpec {
    /// The prompt to display, falling back to a generic question.
    pub fn prompt_text(&self) -> String {
        self.prompt
            .clone()
            .unwrap_or_else(|| format!("Allow language '{}'?", self.code))
    }
}

/// The `*_languages_config.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub languages: Vec<LanguageSpec>,
}

impl LanguageConfig {
    /// Built-in fallback used when no usable config file exists.
    pub fn default_pair() -> Self {
        LanguageConfig {
            languages: vec![
                LanguageSpec {
                    code: "jpn".into(),
                    aliases: vec!["jpn".into(), "jp".into(), "japanese".into()],
                    prompt: Some(
                        "Do you want V to speak their native language + Japanese?".into(),
                    ),
                },
                LanguageSpec {
                    code: "mex".into(),
                    aliases: vec!["mex".into(), "es".into(), "spa".into(), "spanish".into()],
                    prompt: Some(
                        "Do you want V to speak their native language + Spanish?".into(),
                    ),
                },
            ],
        }
    }

    /// Load a config file, normalizing codes/aliases to trimmed lowercase.
    /// Malformed entries and non-string aliases are skipped individually, so
    /// one bad entry never discards the rest of the file. Only a missing or
    /// unparsable file, or one with no usable entry at all, falls back to
    /// [`LanguageConfig::default_pair`].
    pub fn load_or_default(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            return Self::default_pair();
        };
        let Ok(parsed) = serde_json::from_str::<Value>(&data) else {
            return Self::default_pair();
        };
        let Some(entries) = parsed.get("languages").and_then(Value::as_array) else {
            return Self::default_pair();
        };

        let mut normalized = Vec::new();
        for entry in entries {
            let Some(entry) = entry.as_object() else {
                continue;
            };
            let Some(code) = entry.get("code").and_then(Value::as_str) else {
                continue;
            };
            let code = code.trim().to_lowercase();
            if code.is_empty() {
                continue;
            }
            let aliases = entry
                .get("aliases")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|a| a.trim().to_lowercase())
                        .filter(|a| !a.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let prompt = entry
                .get("prompt")
                .and_then(Value::as_str)
                .map(str::to_string);
            normalized.push(LanguageSpec { code, aliases, prompt });
        }

        if normalized.is_empty() {
            Self::default_pair()
        } else {
            LanguageConfig { languages: normalized }
        }
    }

    /// Canonical codes in config order.
    pub fn codes(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.code.clone()).collect()
    }
}

/// Alias -> canonical code lookup built from a [`LanguageConfig`].
///
/// Every code also maps to itself, so `normalize("jpn")` works without a
/// self-alias in the config.
#[derive(Debug, Clone, Default)]
pub struct LangTable {
    aliases: BTreeMap<String, String>,
}

impl LangTable {
    pub fn from_config(config: &LanguageConfig) -> Self {
        let mut aliases = BTreeMap::new();
        for spec in &config.languages {
            aliases.insert(spec.code.clone(), spec.code.clone());
            for alias in &spec.aliases {
                aliases.insert(alias.clone(), spec.code.clone());
            }
        }
        LangTable { aliases }
    }

    /// Build a table from `(alias, code)` pairs. Used for the fixed variant
    /// prefix and display-name tables in [`crate::variant`].
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut aliases = BTreeMap::new();
        for (alias, code) in pairs {
            aliases.insert(alias.to_lowercase(), code.to_lowercase());
            aliases.insert(code.to_lowercase(), code.to_lowercase());
        }
        LangTable { aliases }
    }

    /// Normalize a raw language value to its canonical code, or `None` when
    /// the value is unknown. Matching is trimmed and case-insensitive.
    pub fn normalize(&self, value: &str) -> Option<&str> {
        self.aliases
            .get(&value.trim().to_lowercase())
            .map(String::as_str)
    }
}

/// Depth-first search for a resolvable `"Language"` field.
///
/// A dict's own `"Language"` value wins if the table recognizes it; only when
/// the current level lacks one do we descend into child values.
pub fn find_language<'t>(node: &Value, table: &'t LangTable) -> Option<&'t str> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(raw)) = map.get("Language") {
                if let Some(code) = table.normalize(raw) {
                    return Some(code);
                }
            }
            map.values().find_map(|child| find_language(child, table))
        }
        Value::Array(items) => items.iter().find_map(|item| find_language(item, table)),
        _ => None,
    }
}

/// Map every top-level ID across all sources to its resolved language.
///
/// When two sources disagree on an ID, the full set of observed codes is
/// recorded in the conflict map and the ID resolves to the lexicographically
/// smallest code. Arbitrary, but deterministic and reproducible.
pub fn build_id_language_map<'a, I>(
    sources: I,
    table: &LangTable,
) -> (BTreeMap<String, String>, BTreeMap<String, BTreeSet<String>>)
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut id_to_lang: BTreeMap<String, String> = BTreeMap::new();
    let mut conflicts: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for source in sources {
        let Value::Object(map) = source else {
            continue;
        };
        for (key, entry) in map {
            if !is_id_key(key) {
                continue;
            }
            let Some(lang) = find_language(entry, table) else {
                continue;
            };
            match id_to_lang.get(key) {
                Some(prev) if prev != lang => {
                    let set = conflicts.entry(key.clone()).or_default();
                    set.insert(prev.clone());
                    set.insert(lang.to_string());
                }
                _ => {
                    id_to_lang.insert(key.clone(), lang.to_string());
                }
            }
        }
    }

    // Deterministic tie-break: smallest code wins for conflicted IDs.
    for (id, langs) in &conflicts {
        if let Some(smallest) = langs.iter().next() {
            id_to_lang.insert(id.clone(), smallest.clone());
        }
    }

    (id_to_lang, conflicts)
}
