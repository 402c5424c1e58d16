//! Pseudo-markup tag splicing.
//!
//! Translated variant fields may embed a single self-closing `<kiroshi .../>`
//! tag with attributes `l` (language), `o` (original text), `t` (timing),
//! `b`, `a`. The grammar is fixed and simple, so attribute rewriting is done
//! with targeted regex splices rather than a full parser; a field without the
//! tag is plain reference text.

use once_cell::sync::Lazy;
use regex::Regex;

pub const TAG_MARKER: &str = "<kiroshi";

static L_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"l="[^"]*""#).unwrap());
static O_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"o="[^"]*""#).unwrap());
static T_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"t="([^"]*)""#).unwrap());

/// Whether a field embeds the pseudo-tag.
pub fn contains_tag(field: &str) -> bool {
    field.contains(TAG_MARKER)
}

/// Replace the `l` and `o` attributes, leaving everything else intact.
pub fn set_lang_and_override(field: &str, new_l: &str, new_o: &str) -> String {
    let updated = L_ATTR.replace_all(field, format!(r#"l="{new_l}""#).as_str());
    O_ATTR
        .replace_all(&updated, format!(r#"o="{new_o}""#).as_str())
        .into_owned()
}

/// The value of the `t` attribute, if present.
pub fn timing_attr(field: &str) -> Option<&str> {
    T_ATTR.captures(field).map(|c| c.get(1).unwrap().as_str())
}

/// Build a fresh tag with the given language, override text, and timing.
pub fn make_tag(l: &str, o: &str, t: &str) -> String {
    format!(r#"<kiroshi l="{l}" o="{o}" t="{t}" b="" a=""/>"#)
}

/// Blank the first `o="..."` occurrence to `o=" "`, keeping the rest of the
/// string intact. Returns `None` when nothing changed.
pub fn blank_override(field: &str) -> Option<String> {
    let replaced = O_ATTR.replace(field, r#"o=" ""#);
    if replaced == field {
        None
    } else {
        Some(replaced.into_owned())
    }
}
