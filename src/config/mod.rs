#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::EXTRACTED_COLUMNS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_sql_identifier,
    validate_url, Validate,
};
use serde::Deserialize;

pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

/// Everything a run needs, fixed for its duration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub source: SourceConfig,
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
    pub queries: QueryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub table_attribs: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            table_attribs: EXTRACTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub exchange_rate_path: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            exchange_rate_path: "exchange_rate.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub csv_file: String,
    pub database_url: String,
    pub table_name: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            csv_file: "output.csv".to_string(),
            database_url: "sqlite://Banks.db".to_string(),
            table_name: "Largest_banks".to_string(),
        }
    }
}

/// Relative file paths (rates input, CSV output, progress log, SQLite file)
/// resolve against `base_dir`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub base_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: "./code_log.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub statements: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            statements: vec![
                "SELECT * FROM Largest_banks".to_string(),
                "SELECT AVG(MC_GBP_Billion) FROM Largest_banks".to_string(),
                "SELECT Name from Largest_banks LIMIT 5".to_string(),
            ],
        }
    }
}

impl EtlConfig {
    pub fn base_dir(&self) -> &str {
        &self.storage.base_dir
    }

    pub fn database_url(&self) -> &str {
        &self.load.database_url
    }

    pub fn log_path(&self) -> &str {
        &self.log.path
    }
}

impl ConfigProvider for EtlConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn table_attribs(&self) -> &[String] {
        &self.source.table_attribs
    }

    fn exchange_rate_path(&self) -> &str {
        &self.transform.exchange_rate_path
    }

    fn csv_path(&self) -> &str {
        &self.load.csv_file
    }

    fn table_name(&self) -> &str {
        &self.load.table_name
    }

    fn queries(&self) -> &[String] {
        &self.queries.statements
    }
}

impl Validate for EtlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.url", &self.source.url)?;

        if self.source.table_attribs != EXTRACTED_COLUMNS {
            return Err(EtlError::InvalidConfigValueError {
                field: "source.table_attribs".to_string(),
                value: self.source.table_attribs.join(","),
                reason: format!("Expected columns {}", EXTRACTED_COLUMNS.join(",")),
            });
        }

        validate_path("transform.exchange_rate_path", &self.transform.exchange_rate_path)?;
        validate_file_extension("transform.exchange_rate_path", &self.transform.exchange_rate_path, &["csv"])?;
        validate_path("load.csv_file", &self.load.csv_file)?;
        validate_file_extension("load.csv_file", &self.load.csv_file, &["csv"])?;
        validate_path("storage.base_dir", &self.storage.base_dir)?;
        validate_path("log.path", &self.log.path)?;
        validate_sql_identifier("load.table_name", &self.load.table_name)?;

        if !self.load.database_url.starts_with("sqlite:") {
            return Err(EtlError::InvalidConfigValueError {
                field: "load.database_url".to_string(),
                value: self.load.database_url.clone(),
                reason: "Only sqlite: database URLs are supported".to_string(),
            });
        }

        if self.queries.statements.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "queries.statements".to_string(),
            });
        }
        for statement in &self.queries.statements {
            validate_non_empty_string("queries.statements", statement)?;
        }

        Ok(())
    }
}
