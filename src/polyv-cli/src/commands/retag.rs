//! `polyv retag` - rewrite pseudo-tag attributes toward each entry's
//! reference language.

use anyhow::Result;
use std::path::Path;

use polyv::document::{load_json, write_json};
use polyv::variant::{retag_entry, variant_prefix_table};

use crate::cli::RetagArgs;
use crate::run_log::RunLog;

fn process_file(path: &Path, log: &mut RunLog) {
    log.section(&format!("Processing file {}", path.display()));

    let mut doc = match load_json(path) {
        Ok(doc) => doc,
        Err(e) => {
            let msg = format!("Error reading {}: {e}", path.display());
            eprintln!("{msg}");
            log.push(msg);
            return;
        }
    };

    let table = variant_prefix_table();
    if let Some(map) = doc.as_object_mut() {
        for (id, payload) in map.iter_mut() {
            let Some(entry) = payload.as_object_mut() else {
                log.push(format!("{id}: malformed entry, skipped"));
                continue;
            };
            log.push(format!("Processing entry {id}"));
            let outcome = retag_entry(entry, &table);
            log.extend(outcome.events.into_iter().map(|e| format!("  {e}")));
        }
    }

    match write_json(path, &doc, false) {
        Ok(()) => log.push(format!("Modifications saved in {}", path.display())),
        Err(e) => {
            let msg = format!("Error writing {}: {e}", path.display());
            eprintln!("{msg}");
            log.push(msg);
        }
    }
}

pub fn handle(args: &RetagArgs) -> Result<()> {
    let mut log = RunLog::new("Retag Log");

    for path in &args.files {
        if path.exists() {
            process_file(path, &mut log);
        } else {
            let msg = format!("File not found: {}", path.display());
            println!("{msg}");
            log.push(msg);
        }
    }

    log.write(&args.log);
    Ok(())
}
