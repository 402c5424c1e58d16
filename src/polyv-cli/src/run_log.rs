//! Plain-text run logs.
//!
//! Each tool persists the full list of decisions it took, one line each, so
//! users can audit a run after the fact. Failure to write the log is a
//! warning, never fatal.

use std::fs;
use std::path::Path;

/// Collected log lines for one tool invocation.
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new(title: &str) -> Self {
        RunLog {
            lines: vec![format!("=== {title} ===")],
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn section(&mut self, title: &str) {
        if self.lines.len() > 1 {
            self.lines.push(String::new());
        }
        self.lines.push(format!("=== {title} ==="));
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for line in lines {
            self.lines.push(line.into());
        }
    }

    /// Write the log; prints a warning instead of failing the run.
    pub fn write(&self, path: &Path) {
        let body = self.lines.join("\n") + "\n";
        if let Err(e) = fs::write(path, body) {
            eprintln!("WARNING: failed to write log {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.txt");

        let mut log = RunLog::new("Merge Log");
        log.push("ID 1: added");
        log.section("CDT Merge Log");
        log.push("ID 2: kept base");
        log.write(&path);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== Merge Log ===\nID 1: added\n"));
        assert!(text.contains("\n=== CDT Merge Log ===\nID 2: kept base\n"));
    }
}
