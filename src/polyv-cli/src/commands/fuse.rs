//! `polyv fuse` - merge a base dataset with an extension dataset.
//!
//! Detail documents (cnc/cdt) use the keep-base key union; the optional
//! name -> Ids index uses the global-ID list union. Every per-ID decision
//! lands in the merge log.

use anyhow::{Context, Result};
use std::path::Path;

use polyv::document::{load_json, write_json};
use polyv::merge::{merge_id_lists_union, merge_keep_base, MergeEvent};

use crate::cli::FuseArgs;
use crate::run_log::RunLog;

fn merge_pair(
    base_path: &Path,
    extra_path: &Path,
    out_path: &Path,
    log: &mut RunLog,
    section: &str,
) -> Result<()> {
    let base = load_json(base_path)
        .with_context(|| format!("Failed to load {}", base_path.display()))?;
    let extra = load_json(extra_path)
        .with_context(|| format!("Failed to load {}", extra_path.display()))?;

    let (merged, events) = merge_keep_base(base, &extra);

    log.section(section);
    log.extend(events.iter().map(MergeEvent::to_string));

    write_json(out_path, &merged, false)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    Ok(())
}

pub fn handle(args: &FuseArgs) -> Result<()> {
    let mut log = RunLog::new("Fusion Log");

    merge_pair(&args.base_cnc, &args.extra_cnc, &args.out_cnc, &mut log, "CNC Merge Log")?;
    merge_pair(&args.base_cdt, &args.extra_cdt, &args.out_cdt, &mut log, "CDT Merge Log")?;

    if let (Some(base_info), Some(extra_info), Some(out_info)) =
        (&args.base_info, &args.extra_info, &args.out_info)
    {
        let base = load_json(base_info)
            .with_context(|| format!("Failed to load {}", base_info.display()))?;
        let extra = load_json(extra_info)
            .with_context(|| format!("Failed to load {}", extra_info.display()))?;

        let (merged, events) = merge_id_lists_union(base, &extra);

        log.section("ID Info Merge Log");
        log.extend(events.iter().map(MergeEvent::to_string));

        write_json(out_info, &merged, false)
            .with_context(|| format!("Failed to write {}", out_info.display()))?;
    }

    log.write(&args.log);
    println!(
        "Merge complete. Merged files are saved next to the inputs; detailed log in {}.",
        args.log.display()
    );
    Ok(())
}
