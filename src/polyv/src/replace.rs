//! Backup-then-promote replacement of manifest files.
//!
//! New document contents are staged as temporary siblings, originals are
//! moved into a backup directory (renamed on collision rather than
//! overwritten), and only then are the temporaries promoted into place. A
//! failure at any stage deletes the written temporaries best-effort and
//! surfaces a single error naming the stage; originals already moved into the
//! backup directory stay there.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::document::{write_json, DocumentError};

#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error("failed to stage temporary for '{label}' at {path}: {source}")]
    Stage {
        label: String,
        path: PathBuf,
        source: DocumentError,
    },

    #[error("failed to back up '{label}' from {path}: {source}")]
    Backup {
        label: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to promote '{label}' into {path}: {source}")]
    Promote {
        label: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One file to replace: a logical label, the original path, and the new
/// content.
#[derive(Debug)]
pub struct Replacement {
    pub label: String,
    pub path: PathBuf,
    pub content: Value,
}

impl Replacement {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, content: Value) -> Self {
        Replacement {
            label: label.into(),
            path: path.into(),
            content,
        }
    }
}

fn temp_path(original: &Path) -> PathBuf {
    let mut name = original
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp.new");
    original.with_file_name(name)
}

/// Pick a destination in `backup_dir` for `original`, appending `.bak<N>`
/// before the suffix instead of overwriting an existing backup.
fn backup_destination(backup_dir: &Path, original: &Path) -> PathBuf {
    let name = original.file_name().map(PathBuf::from).unwrap_or_default();
    let mut dest = backup_dir.join(&name);
    if !dest.exists() {
        return dest;
    }

    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("backup");
    let suffix = original
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| format!(".{s}"))
        .unwrap_or_default();
    let mut i = 1;
    loop {
        dest = backup_dir.join(format!("{stem}.bak{i}{suffix}"));
        if !dest.exists() {
            return dest;
        }
        i += 1;
    }
}

/// Stage, back up, and promote a set of replacements.
///
/// Not atomic across files between the backup and promote stages; callers
/// get a single error for the first failure, with temporaries cleaned up.
pub fn backup_then_promote(
    replacements: &[Replacement],
    backup_dir: &Path,
    sort_keys: bool,
) -> Result<(), ReplaceError> {
    let mut temps: Vec<PathBuf> = Vec::new();

    let result = run_swap(replacements, backup_dir, sort_keys, &mut temps);
    if result.is_err() {
        for temp in &temps {
            let _ = fs::remove_file(temp);
        }
    }
    result
}

fn run_swap(
    replacements: &[Replacement],
    backup_dir: &Path,
    sort_keys: bool,
    temps: &mut Vec<PathBuf>,
) -> Result<(), ReplaceError> {
    // 1) Stage every new document as a temporary sibling.
    for replacement in replacements {
        let tmp = temp_path(&replacement.path);
        write_json(&tmp, &replacement.content, sort_keys).map_err(|source| {
            ReplaceError::Stage {
                label: replacement.label.clone(),
                path: tmp.clone(),
                source,
            }
        })?;
        temps.push(tmp);
    }

    // 2) Move originals into the backup directory.
    fs::create_dir_all(backup_dir).map_err(|source| ReplaceError::Backup {
        label: "backup directory".into(),
        path: backup_dir.to_path_buf(),
        source,
    })?;
    for replacement in replacements {
        let dest = backup_destination(backup_dir, &replacement.path);
        fs::rename(&replacement.path, &dest).map_err(|source| ReplaceError::Backup {
            label: replacement.label.clone(),
            path: replacement.path.clone(),
            source,
        })?;
    }

    // 3) Promote temporaries into place.
    for (replacement, tmp) in replacements.iter().zip(temps.iter()) {
        fs::rename(tmp, &replacement.path).map_err(|source| ReplaceError::Promote {
            label: replacement.label.clone(),
            path: replacement.path.clone(),
            source,
        })?;
    }

    temps.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_original(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_replace_and_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        let backup_dir = dir.join("backup_originals");

        let a = write_original(dir, "a.json", "{\"old\": true}");
        let replacements = vec![Replacement::new("a", &a, json!({"new": true}))];

        backup_then_promote(&replacements, &backup_dir, false).unwrap();

        let replaced: Value =
            serde_json::from_str(&fs::read_to_string(&a).unwrap()).unwrap();
        assert_eq!(replaced, json!({"new": true}));

        let backed_up = fs::read_to_string(backup_dir.join("a.json")).unwrap();
        assert_eq!(backed_up, "{\"old\": true}");

        // No temp left behind.
        assert!(!temp_path(&a).exists());
    }

    #[test]
    fn test_backup_collision_renames() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        let backup_dir = dir.join("backup_originals");

        let a = write_original(dir, "a.json", "{\"gen\": 1}");
        backup_then_promote(
            &[Replacement::new("a", &a, json!({"gen": 2}))],
            &backup_dir,
            false,
        )
        .unwrap();
        backup_then_promote(
            &[Replacement::new("a", &a, json!({"gen": 3}))],
            &backup_dir,
            false,
        )
        .unwrap();

        assert!(backup_dir.join("a.json").exists());
        assert!(backup_dir.join("a.bak1.json").exists());
    }

    #[test]
    fn test_stage_failure_leaves_originals_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        let backup_dir = dir.join("backup_originals");

        let a = write_original(dir, "a.json", "{\"a\": 1}");
        let b = write_original(dir, "b.json", "{\"b\": 1}");
        let c = write_original(dir, "c.json", "{\"c\": 1}");

        // Force the second staging write to fail: a directory squats on the
        // temp path.
        fs::create_dir(temp_path(&b)).unwrap();

        let replacements = vec![
            Replacement::new("a", &a, json!({"a": 2})),
            Replacement::new("b", &b, json!({"b": 2})),
            Replacement::new("c", &c, json!({"c": 2})),
        ];
        let err = backup_then_promote(&replacements, &backup_dir, false).unwrap_err();
        assert!(matches!(err, ReplaceError::Stage { .. }));

        // Nothing was moved into the backup directory.
        assert!(!backup_dir.exists());

        // Originals still hold their old content.
        for (path, text) in [(&a, "{\"a\": 1}"), (&b, "{\"b\": 1}"), (&c, "{\"c\": 1}")] {
            assert_eq!(&fs::read_to_string(path).unwrap(), text);
        }

        // The successfully written first temp was cleaned up.
        assert!(!temp_path(&a).exists());
    }
}
