use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ErrorKind;

/// Append-only plain-text error log.
///
/// The file is opened, appended and closed on every write; no handle is kept.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<timestamp> - <kind>: <message>`
    pub fn append(&self, kind: ErrorKind, message: &str) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let line = format_line(&timestamp, kind, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

fn format_line(timestamp: &str, kind: ErrorKind, message: &str) -> String {
    // keep one entry per line
    let message = message.replace(['\r', '\n'], " ");
    format!("{} - {}: {}\n", timestamp, kind, message)
}
