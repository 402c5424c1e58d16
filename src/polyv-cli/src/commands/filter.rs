//! `polyv filter` - language filtering with backup and report.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;

use polyv::document::{collect_ids, load_json, write_json};
use polyv::filter::{filter_by_language, FileStats, UnknownPolicy};
use polyv::lang::{build_id_language_map, LangTable, LanguageConfig};
use polyv::replace::{backup_then_promote, Replacement};
use polyv::report::{CrossChecks, FileReports, FilterReport, ReportSummary};

use crate::cli::FilterArgs;
use crate::prompt::prompt_yes_no;

/// Ask the configured question for every language; the "yes" answers form
/// the allowed set.
fn compute_allowed_languages(config: &LanguageConfig) -> Result<BTreeSet<String>> {
    let mut allowed = BTreeSet::new();
    for spec in &config.languages {
        if prompt_yes_no(&spec.prompt_text()).context("Failed to read language selection")? {
            allowed.insert(spec.code.clone());
        }
    }
    Ok(allowed)
}

pub fn handle(args: &FilterArgs) -> Result<()> {
    let config = LanguageConfig::load_or_default(&args.config);
    let table = LangTable::from_config(&config);

    if !args.cdt.exists() || !args.cnc.exists() || !args.info.exists() {
        bail!(
            "One or more input files do not exist. Expected default layout under ./res/ \
             or pass explicit paths.\n  CDT : {}\n  CNC : {}\n  INFO: {}",
            args.cdt.display(),
            args.cnc.display(),
            args.info.display()
        );
    }

    let cdt = load_json(&args.cdt)
        .with_context(|| format!("Failed to load {}", args.cdt.display()))?;
    let cnc = load_json(&args.cnc)
        .with_context(|| format!("Failed to load {}", args.cnc.display()))?;
    let info = load_json(&args.info)
        .with_context(|| format!("Failed to load {}", args.info.display()))?;

    let (id_to_lang, conflicts) = build_id_language_map([&cdt, &cnc], &table);

    let allowed = compute_allowed_languages(&config)?;
    if allowed.is_empty() {
        println!("Allowed languages: none");
    } else {
        println!("Allowed languages: {:?}", allowed.iter().collect::<Vec<_>>());
    }

    // Inventory for the report's cross-checks, taken before filtering.
    let ids_in_cdt = collect_ids(&cdt);
    let ids_in_cnc = collect_ids(&cnc);
    let ids_in_info = collect_ids(&info);

    let mut unknown_ids = BTreeSet::new();
    let mut cdt_stats = FileStats::default();
    let mut cnc_stats = FileStats::default();
    let mut info_stats = FileStats::default();

    let cdt_new = filter_by_language(
        &cdt, &id_to_lang, &allowed, UnknownPolicy::Keep, &mut cdt_stats, &mut unknown_ids,
    );
    let cnc_new = filter_by_language(
        &cnc, &id_to_lang, &allowed, UnknownPolicy::Keep, &mut cnc_stats, &mut unknown_ids,
    );
    let info_new = filter_by_language(
        &info, &id_to_lang, &allowed, UnknownPolicy::Drop, &mut info_stats, &mut unknown_ids,
    );

    let replacements = vec![
        Replacement::new("cdt", &args.cdt, cdt_new),
        Replacement::new("cnc", &args.cnc, cnc_new),
        Replacement::new("info", &args.info, info_new),
    ];
    backup_then_promote(&replacements, &args.backup_dir, args.sort_keys)
        .context("Failed to replace originals")?;

    let report = FilterReport {
        summary: ReportSummary {
            allowed_languages: allowed.iter().cloned().collect(),
            configured_languages: config.codes(),
            total_ids_mapped: id_to_lang.len(),
            conflict_count: conflicts.len(),
            backup_dir: args.backup_dir.display().to_string(),
            config_path: args.config.display().to_string(),
        },
        conflicting_ids: conflicts,
        unknown_language_ids: unknown_ids.iter().cloned().collect(),
        cross_checks: CrossChecks::compute(&ids_in_cdt, &ids_in_cnc, &ids_in_info),
        files: FileReports {
            cdt: cdt_stats.clone().into(),
            cnc: cnc_stats.clone().into(),
            id_info: info_stats.clone().into(),
        },
        notes: FilterReport::standard_notes(),
    };

    let report_value =
        serde_json::to_value(&report).context("Failed to serialize filter report")?;
    if let Err(e) = write_json(&args.report, &report_value, args.sort_keys) {
        eprintln!("WARNING: failed to write report {}: {e}", args.report.display());
    }

    println!("\n=== Done ===");
    println!("Replaced originals in place:");
    println!(
        "  {}, {}, {}",
        args.cdt.display(),
        args.cnc.display(),
        args.info.display()
    );
    println!("Backed up originals -> {}", args.backup_dir.display());
    println!("Report -> {}", args.report.display());
    println!("\nCounts (see report for full ID lists):");
    for (label, stats) in [("CDT", &cdt_stats), ("CNC", &cnc_stats), ("IDINFO", &info_stats)] {
        let c = stats.counts();
        println!(
            "  {label} -> kept_allowed={} | kept_unknown={} | removed_disallowed={} | removed_unknown={}",
            c.kept_allowed, c.kept_unknown, c.removed_disallowed, c.removed_unknown
        );
    }

    Ok(())
}
