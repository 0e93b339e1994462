//! Append-only JSONL run log.
//!
//! Each simplification run becomes one JSON line. Appends take an exclusive
//! file lock so concurrent runs never interleave partial lines. By default
//! only text lengths are stored, not the texts themselves.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use klartext_core::entry::{build_log_entry, LogEntry, RunInfo};

use crate::prelude::*;

pub struct RunLogger {
    path: PathBuf,
    store_raw_text: bool,
}

impl RunLogger {
    pub fn new(path: impl Into<PathBuf>, store_raw_text: bool) -> Self {
        Self {
            path: path.into(),
            store_raw_text,
        }
    }

    /// Build an entry for one run and append it to the log.
    pub fn log(&self, source: &str, output: &str, run: &RunInfo) -> Result<LogEntry> {
        let entry = build_log_entry(chrono::Utc::now(), source, output, run, self.store_raw_text);
        self.append(&entry)?;
        Ok(entry)
    }

    /// Append a single entry as one JSON line, under an exclusive lock.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .wrap_err_with(|| f!("failed to create log directory {}", parent.display()))?;
            }
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .wrap_err_with(|| f!("failed to open log file {}", self.path.display()))?;

        file.lock_exclusive()?;
        let write_result = file
            .write_all(line.as_bytes())
            .and_then(|()| file.flush());
        let unlock_result = fs2::FileExt::unlock(&file);
        write_result?;
        unlock_result?;

        Ok(())
    }
}

/// Read every valid entry from a JSONL log file.
///
/// A missing file is an empty log. Malformed lines are skipped so a single
/// corrupt record never blocks reporting.
pub fn load_all_logs(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("failed to read log file {}", path.display()))?;

    let mut entries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(err) => log::debug!("skipping malformed log line: {err}"),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_info() -> RunInfo<'static> {
        RunInfo {
            model: "llama-3.1-8b-instant",
            template: "system_prompt_de",
            language: "de",
        }
    }

    #[test]
    fn test_log_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let logger = RunLogger::new(&path, false);

        logger
            .log("A complicated sentence.", "A simple sentence.", &run_info())
            .unwrap();
        logger
            .log("Another input.", "Another output.", &run_info())
            .unwrap();

        let entries = load_all_logs(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].model, "llama-3.1-8b-instant");
        assert_eq!(entries[0].source_text, None);
        assert_eq!(entries[1].output_text_len, "Another output.".chars().count());
    }

    #[test]
    fn test_store_raw_text_keeps_texts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let logger = RunLogger::new(&path, true);

        logger.log("Source text.", "Output text.", &run_info()).unwrap();

        let entries = load_all_logs(&path).unwrap();
        assert_eq!(entries[0].source_text.as_deref(), Some("Source text."));
        assert_eq!(entries[0].output_text.as_deref(), Some("Output text."));
    }

    #[test]
    fn test_append_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/runs.jsonl");
        let logger = RunLogger::new(&path, false);

        logger.log("Some text.", "Some text.", &run_info()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_missing_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let entries = load_all_logs(&dir.path().join("absent.jsonl")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let logger = RunLogger::new(&path, false);
        logger.log("Good entry.", "Good entry.", &run_info()).unwrap();

        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{not json\n\n");
        std::fs::write(&path, contents).unwrap();
        logger.log("Second good.", "Second good.", &run_info()).unwrap();

        let entries = load_all_logs(&path).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_lines_are_single_line_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let logger = RunLogger::new(&path, true);
        logger
            .log("Line one.\nLine two.", "Output.", &run_info())
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
