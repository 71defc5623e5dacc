//! Append-only upstream failure log

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use crate::application::errors::BotError;
use crate::domain::traits::FailureLog;

/// File-backed failure log. One line per failed upstream fetch:
/// `<timestamp> message: <original text>, code: <status>`
pub struct FileFailureLog {
    path: PathBuf,
    // Serializes appends from the single loop task and tests alike.
    lock: Mutex<()>,
}

impl FileFailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, BotError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| *p != Path::new("")) {
            std::fs::create_dir_all(parent)
                .map_err(|e| BotError::Internal(format!("cannot create log dir: {}", e)))?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl FailureLog for FileFailureLog {
    fn record(&self, message_text: &str, status: u16) {
        let line = format!(
            "{} message: {}, code: {}",
            Utc::now().to_rfc3339(),
            message_text,
            status
        );
        if let Err(e) = self.append(&line) {
            tracing::error!("failed to append to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_appended_with_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upstream.log");
        let log = FileFailureLog::new(&path).unwrap();

        log.record("/dog", 500);
        log.record("/breed shiba", 503);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("message: /dog, code: 500"));
        assert!(lines[1].ends_with("message: /breed shiba, code: 503"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/upstream.log");
        let log = FileFailureLog::new(&path).unwrap();
        log.record("/dog", 502);
        assert!(path.exists());
    }
}
