//! `polyv strip-effect` - remove the translation effect for selected
//! languages, keeping the plain subtitle tag.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

use polyv::document::{load_json, write_json};
use polyv::variant::{display_languages, strip_translation_effect};

use crate::cli::StripArgs;
use crate::prompt::prompt_yes_no;
use crate::run_log::RunLog;

/// One Yes/No question per known language; "yes" selects it for cleaning.
fn select_languages(log: &mut RunLog) -> Result<BTreeSet<String>> {
    println!(
        "This tool removes the translation effect for chosen languages and keeps the \
         plain subtitle tag."
    );
    println!("Please choose the language(s) for which you do not want the translation effect!\n");

    log.section("Language Selection");
    let mut selected = BTreeSet::new();
    for (display_name, code) in display_languages() {
        let question = format!("For {display_name}? Answer yes (remove it) or no (keep it)");
        if prompt_yes_no(&question).context("Failed to read language selection")? {
            selected.insert(code.to_string());
            log.push(format!("Selected to remove effect for: {display_name} ({code})"));
        } else {
            log.push(format!("Kept translation effect for: {display_name} ({code})"));
        }
    }
    log.push(format!("Final selected languages: {selected:?}"));
    Ok(selected)
}

fn process_file(path: &Path, selected: &BTreeSet<String>, log: &mut RunLog) {
    log.section(&format!("Processing file: {}", path.display()));

    let mut doc = match load_json(path) {
        Ok(doc) => doc,
        Err(e) => {
            let msg = format!("Error reading {}: {e}", path.display());
            eprintln!("{msg}");
            log.push(msg);
            return;
        }
    };

    let mut entries_modified = 0usize;
    if let Some(map) = doc.as_object_mut() {
        for (id, payload) in map.iter_mut() {
            let Some(entry) = payload.as_object_mut() else {
                continue;
            };
            let outcome = strip_translation_effect(entry, selected);
            if outcome.changed() {
                entries_modified += outcome.changed_fields;
                log.extend(
                    outcome
                        .events
                        .into_iter()
                        .map(|e| format!("Modified entry ID {id}: {e}")),
                );
            }
        }
    }

    if entries_modified == 0 {
        let msg = format!("No modification needed in {}.", path.display());
        println!("{msg}");
        log.push(msg);
        return;
    }

    match write_json(path, &doc, false) {
        Ok(()) => {
            let msg = format!(
                "Modified and saved: {} (fields changed: {entries_modified})",
                path.display()
            );
            println!("{msg}");
            log.push(msg);
        }
        Err(e) => {
            let msg = format!("Error writing {}: {e}", path.display());
            eprintln!("{msg}");
            log.push(msg);
        }
    }
}

pub fn handle(args: &StripArgs) -> Result<()> {
    let mut log = RunLog::new("Translation Effect Removal");

    let selected = select_languages(&mut log)?;
    if selected.is_empty() {
        println!("No language selected. Exiting...");
        log.push("No language was selected. Exited without processing.");
        log.write(&args.log);
        return Ok(());
    }

    for path in &args.files {
        if path.is_file() {
            println!("Processing file: {}", path.display());
            process_file(path, &selected, &mut log);
        } else {
            let msg = format!("{} not found, skipping.", path.display());
            println!("{msg}");
            log.push(msg);
        }
    }

    log.write(&args.log);
    println!("Log file written: {}", args.log.display());
    Ok(())
}
