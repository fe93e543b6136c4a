use crate::domain::ports::ProgressLog;
use crate::utils::error::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

pub fn format_entry(timestamp: &chrono::DateTime<Local>, message: &str) -> String {
    format!("{} : {}", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// Appends one timestamped line per stage to a text file.
#[derive(Debug, Clone)]
pub struct FileProgressLog {
    path: PathBuf,
}

impl FileProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressLog for FileProgressLog {
    fn record_stage(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_entry(&Local::now(), message))?;
        tracing::info!("{}", message);
        Ok(())
    }
}

/// Keeps stage entries in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressLog for MemoryProgressLog {
    fn record_stage(&self, message: &str) -> Result<()> {
        // A panicked writer leaves a complete Vec behind; keep appending to it.
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        Ok(())
    }
}
