use crate::config::EtlConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "banks-etl")]
#[command(about = "Extracts the largest banks table, converts market caps and loads them to CSV and SQLite")]
pub struct CliArgs {
    /// Path to a TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn load_config(&self) -> Result<EtlConfig> {
        match &self.config {
            Some(path) => EtlConfig::from_file(path),
            None => Ok(EtlConfig::default()),
        }
    }
}
