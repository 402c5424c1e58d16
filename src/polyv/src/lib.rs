//! # polyv
//!
//! JSON-transformation pipeline for multilingual voice/subtitle manifest
//! packs: merging curated and extension datasets, resolving each dialogue
//! ID's language, filtering manifests down to the languages a user opted
//! into, patching embedded pseudo-markup variant tags, and replacing files
//! on disk with a backup-then-promote discipline.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use polyv::document::load_json;
//! use polyv::lang::{build_id_language_map, LangTable, LanguageConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LanguageConfig::load_or_default(Path::new("res/languages_config.json"));
//! let table = LangTable::from_config(&config);
//!
//! let cdt = load_json(Path::new("res/CVLPV_cdt_data.json"))?;
//! let cnc = load_json(Path::new("res/CVLPV_cnc_data.json"))?;
//!
//! let (id_to_lang, conflicts) = build_id_language_map([&cdt, &cnc], &table);
//! println!("{} IDs mapped, {} conflicts", id_to_lang.len(), conflicts.len());
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod filter;
pub mod lang;
pub mod merge;
pub mod replace;
pub mod report;
pub mod swap;
pub mod tag;
pub mod variant;

// Re-export commonly used items
#[doc(inline)]
pub use document::{collect_ids, is_id_key, load_json, write_json, DocumentError};
#[doc(inline)]
pub use filter::{filter_by_language, FileStats, UnknownPolicy};
#[doc(inline)]
pub use lang::{build_id_language_map, find_language, LangTable, LanguageConfig};
#[doc(inline)]
pub use merge::{merge_id_lists_union, merge_keep_base, MergeEvent};
#[doc(inline)]
pub use replace::{backup_then_promote, Replacement, ReplaceError};
#[doc(inline)]
pub use report::FilterReport;
