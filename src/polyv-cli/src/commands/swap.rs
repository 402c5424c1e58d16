//! `polyv swap-voice` - swap gendered voice fields across documents.

use anyhow::Result;
use std::path::Path;

use polyv::document::{load_json, write_json};
use polyv::swap::{annotate_npc_info, swap_document, SwapScope};

use crate::cli::SwapArgs;
use crate::run_log::RunLog;

fn process_file(path: &Path, scope: &SwapScope, log: &mut RunLog) {
    log.section(&format!("Working on: {} ({:?})", path.display(), scope));

    let mut doc = match load_json(path) {
        Ok(doc) => doc,
        Err(e) => {
            let msg = format!("ERROR reading {}: {e}", path.display());
            eprintln!("{msg}");
            log.push(msg);
            return;
        }
    };

    let summary = swap_document(&mut doc, scope);
    log.extend(summary.events);

    match write_json(path, &doc, false) {
        Ok(()) => log.push(format!(
            "Updated {}. IDs processed: {}, skipped: {}.",
            path.display(),
            summary.processed,
            summary.skipped
        )),
        Err(e) => {
            let msg = format!("ERROR writing {}: {e}", path.display());
            eprintln!("{msg}");
            log.push(msg);
        }
    }
}

fn update_npc_info(path: &Path, log: &mut RunLog) {
    if !path.exists() {
        log.push(format!("File not found: {}. Skipped npc info update.", path.display()));
        return;
    }

    let mut doc = match load_json(path) {
        Ok(doc) => doc,
        Err(e) => {
            log.push(format!("ERROR reading {}: {e}", path.display()));
            return;
        }
    };

    if !annotate_npc_info(&mut doc) {
        log.push(format!(
            "Unexpected structure in {}: missing 'V' object.",
            path.display()
        ));
        return;
    }

    match write_json(path, &doc, false) {
        Ok(()) => log.push(format!("Updated {}: marked as voice-reassigned.", path.display())),
        Err(e) => log.push(format!("ERROR writing {}: {e}", path.display())),
    }
}

pub fn handle(args: &SwapArgs) -> Result<()> {
    let mut log = RunLog::new("Voice Swap Log");

    for path in &args.all_files {
        process_file(path, &SwapScope::AllIds, &mut log);
    }
    let filtered_scope = SwapScope::NpcPrefix(args.npc_prefix.clone());
    for path in &args.filtered_files {
        process_file(path, &filtered_scope, &mut log);
    }

    update_npc_info(&args.npc_info, &mut log);

    log.write(&args.log);
    println!("Operation completed. Detailed log in {}.", args.log.display());
    Ok(())
}
