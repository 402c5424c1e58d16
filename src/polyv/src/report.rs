//! The filter run report.
//!
//! Everything the filter decided, serialized next to the filtered files so a
//! user can audit exactly which IDs were kept or removed and why.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::filter::{FileStats, FileStatsCounts};

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub allowed_languages: Vec<String>,
    pub configured_languages: Vec<String>,
    pub total_ids_mapped: usize,
    pub conflict_count: usize,
    pub backup_dir: String,
    pub config_path: String,
}

#[derive(Debug, Serialize)]
pub struct CrossChecks {
    pub ids_in_cdt_not_in_info: Vec<String>,
    pub ids_in_cnc_not_in_info: Vec<String>,
    pub ids_in_info_not_in_sources: Vec<String>,
}

impl CrossChecks {
    /// Set differences between the detail documents and the index.
    pub fn compute(
        ids_in_cdt: &BTreeSet<String>,
        ids_in_cnc: &BTreeSet<String>,
        ids_in_info: &BTreeSet<String>,
    ) -> Self {
        let sources: BTreeSet<&String> = ids_in_cdt.union(ids_in_cnc).collect();
        CrossChecks {
            ids_in_cdt_not_in_info: ids_in_cdt.difference(ids_in_info).cloned().collect(),
            ids_in_cnc_not_in_info: ids_in_cnc.difference(ids_in_info).cloned().collect(),
            ids_in_info_not_in_sources: ids_in_info
                .iter()
                .filter(|id| !sources.contains(id))
                .cloned()
                .collect(),
        }
    }
}

/// One file's stats, with counts alongside the raw ID lists.
#[derive(Debug, Serialize)]
pub struct FileStatsReport {
    #[serde(flatten)]
    pub stats: FileStats,
    pub counts: FileStatsCounts,
}

impl From<FileStats> for FileStatsReport {
    fn from(stats: FileStats) -> Self {
        let counts = stats.counts();
        FileStatsReport { stats, counts }
    }
}

#[derive(Debug, Serialize)]
pub struct FileReports {
    pub cdt: FileStatsReport,
    pub cnc: FileStatsReport,
    pub id_info: FileStatsReport,
}

#[derive(Debug, Serialize)]
pub struct FilterReport {
    pub summary: ReportSummary,
    pub conflicting_ids: BTreeMap<String, BTreeSet<String>>,
    pub unknown_language_ids: Vec<String>,
    pub cross_checks: CrossChecks,
    pub files: FileReports,
    pub notes: Vec<String>,
}

impl FilterReport {
    /// The fixed explanatory notes appended to every report.
    pub fn standard_notes() -> Vec<String> {
        vec![
            "Languages, aliases and prompts are driven by the languages config file.".into(),
            "Exact schema preserved; only ID entries are removed per policy.".into(),
            "CDT/CNC keep unknown-language IDs; ID_INFO removes unknown-language IDs.".into(),
            "Original files are moved into the backup directory and replaced by filtered \
             versions with original names."
                .into(),
        ]
    }
}
