use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

const SQLITE_FILE_PREFIX: &str = "sqlite://";

/// Run directory for every file the ETL touches: the rates input, the CSV
/// output, the progress log and the SQLite file. Absolute paths are kept.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Rewrites a relative `sqlite://` file URL into the run directory.
    /// In-memory and other URL forms pass through.
    pub fn resolve_database_url(&self, database_url: &str) -> String {
        match database_url.strip_prefix(SQLITE_FILE_PREFIX) {
            Some(file) if !file.is_empty() && !file.starts_with(':') => {
                format!("{}{}", SQLITE_FILE_PREFIX, self.resolve(file).display())
            }
            _ => database_url.to_string(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(path))?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), target.display());
        Ok(())
    }
}
