//! contact_log.rs — append-only sink for human-follow-up requests.
//!
//! Records are written as they arrive; duplicates and oddly formatted numbers
//! are not deduplicated or normalized here. The file format is one line per
//! request: `[YYYY-MM-DD HH:MM] New contact request: <phone>`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};

/// One contact request, timestamped at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub timestamp: DateTime<Local>,
    pub phone_number: String,
}

impl ContactRecord {
    pub fn now(phone_number: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            phone_number: phone_number.into(),
        }
    }

    /// The on-disk line format (without trailing newline).
    pub fn to_log_line(&self) -> String {
        format!(
            "[{}] New contact request: {}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.phone_number
        )
    }
}

/// Append-only sink. Implementations must preserve arrival order.
pub trait ContactSink: Send + Sync {
    fn append(&self, record: &ContactRecord) -> io::Result<()>;
}

/// File-backed sink, one line per record.
pub struct FileContactSink {
    path: PathBuf,
}

impl FileContactSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ContactSink for FileContactSink {
    fn append(&self, record: &ContactRecord) -> io::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{}", record.to_log_line())?;
        tracing::info!(path = %self.path.display(), "contact request logged");
        Ok(())
    }
}

/// In-memory sink for tests and local runs.
#[derive(Default)]
pub struct MemoryContactSink {
    entries: Mutex<Vec<ContactRecord>>,
}

impl MemoryContactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<ContactRecord> {
        self.entries.lock().expect("contact sink mutex poisoned").clone()
    }
}

impl ContactSink for MemoryContactSink {
    fn append(&self, record: &ContactRecord) -> io::Result<()> {
        self.entries
            .lock()
            .expect("contact sink mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}
