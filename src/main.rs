use anyhow::Context;
use banks_etl::core::ConfigProvider;
use banks_etl::utils::{logger, validation::Validate};
use banks_etl::{
    BankStore, BanksPipeline, CliArgs, EtlConfig, EtlEngine, EtlError, FileProgressLog,
    HtmlTableParser, HttpDocumentSource, LocalStorage, RunReport,
};
use clap::Parser;

async fn run(config: EtlConfig) -> banks_etl::Result<RunReport> {
    let storage = LocalStorage::new(config.base_dir());
    let store = BankStore::open(&storage.resolve_database_url(config.database_url())).await?;
    let progress = FileProgressLog::new(storage.resolve(config.log_path()));
    let queries = config.queries().to_vec();

    let pipeline = BanksPipeline::new(
        HttpDocumentSource::new(),
        HtmlTableParser::new(),
        storage,
        config,
        store,
    );
    EtlEngine::new(pipeline, progress).run(&queries).await
}

fn report_failure(e: &EtlError) -> ! {
    tracing::error!("❌ ETL process failed: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting banks-etl");
    let config = args
        .load_config()
        .with_context(|| format!("Failed to load config {:?}", args.config))?;
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        report_failure(&e);
    }

    match run(config).await {
        Ok(report) => {
            for (statement, result) in &report.queries {
                println!("{}", statement);
                println!("{}", result);
                println!();
            }
            tracing::info!("✅ ETL process completed successfully!");
            println!(
                "✅ {} banks saved to {} and the database ({} source rows skipped)",
                report.rows_loaded, report.csv_path, report.skipped_rows
            );
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}
