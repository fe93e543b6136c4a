pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{BankStore, FileProgressLog, HtmlTableParser, HttpDocumentSource, LocalStorage};
pub use config::EtlConfig;
pub use core::{
    etl::{EtlEngine, RunReport},
    pipeline::BanksPipeline,
};
pub use utils::error::{EtlError, Result};
