use crate::core::Pipeline;
use crate::domain::model::QueryResult;
use crate::domain::ports::ProgressLog;
use crate::utils::error::Result;

pub const STAGE_START: &str = "Preliminaries complete. Initiating ETL process";
pub const STAGE_EXTRACTED: &str = "Data extraction complete. Initiating Transformation process";
pub const STAGE_TRANSFORMED: &str = "Transformation complete. Initiating Csv Load process";
pub const STAGE_CSV_LOADED: &str = "Csv Created. Initiating Database Load process";
pub const STAGE_DB_LOADED: &str = "Database Load complete as table. Running queries";
pub const STAGE_DONE: &str = "ETL process complete. Exiting the code";

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub csv_path: String,
    pub rows_loaded: usize,
    pub skipped_rows: usize,
    /// Each statement paired with its result, in execution order.
    pub queries: Vec<(String, QueryResult)>,
}

pub struct EtlEngine<P: Pipeline, L: ProgressLog> {
    pipeline: P,
    progress: L,
}

impl<P: Pipeline, L: ProgressLog> EtlEngine<P, L> {
    pub fn new(pipeline: P, progress: L) -> Self {
        Self { pipeline, progress }
    }

    /// Runs every stage in order and then each query. The first error ends
    /// the run; stages already completed are not rolled back.
    pub async fn run(&self, queries: &[String]) -> Result<RunReport> {
        self.progress.record_stage(STAGE_START)?;

        let extraction = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} records ({} rows skipped)",
            extraction.records.len(),
            extraction.skipped.len()
        );
        self.progress.record_stage(STAGE_EXTRACTED)?;

        let table = self.pipeline.transform(extraction.records).await?;
        tracing::info!("Transformed {} records", table.len());
        self.progress.record_stage(STAGE_TRANSFORMED)?;

        let csv_path = self.pipeline.load_csv(&table).await?;
        tracing::info!("CSV saved to: {}", csv_path);
        self.progress.record_stage(STAGE_CSV_LOADED)?;

        let rows_loaded = self.pipeline.load_store(table).await?;
        tracing::info!("Loaded {} rows into the database", rows_loaded);
        self.progress.record_stage(STAGE_DB_LOADED)?;

        let mut results = Vec::with_capacity(queries.len());
        for statement in queries {
            tracing::debug!("Running query: {}", statement);
            let result = self.pipeline.query(statement).await?;
            results.push((statement.clone(), result));
        }
        self.progress.record_stage(STAGE_DONE)?;

        Ok(RunReport {
            csv_path,
            rows_loaded,
            skipped_rows: extraction.skipped.len(),
            queries: results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::progress::MemoryProgressLog;
    use crate::core::{BankRecord, BankTable, Extraction};
    use crate::domain::model::{EnrichedBankRecord, SkipReason, SkippedRow, SqlValue};
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedPipeline {
        fail_transform: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedPipeline {
        fn called(&self, step: &'static str) {
            self.calls.lock().unwrap().push(step);
        }
    }

    #[async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Result<Extraction> {
            self.called("extract");
            Ok(Extraction {
                records: vec![BankRecord {
                    name: "Bank A".to_string(),
                    market_cap_usd: 100.0,
                }],
                skipped: vec![SkippedRow {
                    row: 3,
                    reason: SkipReason::MissingValue,
                }],
            })
        }

        async fn transform(&self, data: Vec<BankRecord>) -> Result<BankTable> {
            self.called("transform");
            if self.fail_transform {
                return Err(EtlError::MissingRateError {
                    currency: "INR".to_string(),
                });
            }
            Ok(data
                .into_iter()
                .map(|r| EnrichedBankRecord {
                    name: r.name,
                    market_cap_usd: r.market_cap_usd,
                    market_cap_gbp: 80.0,
                    market_cap_eur: 93.0,
                    market_cap_inr: 8295.0,
                })
                .collect())
        }

        async fn load_csv(&self, _table: &BankTable) -> Result<String> {
            self.called("load_csv");
            Ok("output.csv".to_string())
        }

        async fn load_store(&self, table: BankTable) -> Result<usize> {
            self.called("load_store");
            Ok(table.len())
        }

        async fn query(&self, _statement: &str) -> Result<QueryResult> {
            self.called("query");
            Ok(QueryResult {
                columns: vec!["n".to_string()],
                rows: vec![vec![SqlValue::Integer(1)]],
            })
        }
    }

    #[tokio::test]
    async fn test_run_records_every_stage_in_order() {
        let log = MemoryProgressLog::new();
        let engine = EtlEngine::new(ScriptedPipeline::default(), log.clone());
        let queries = vec!["SELECT 1".to_string(), "SELECT 2".to_string()];

        let report = engine.run(&queries).await.unwrap();

        assert_eq!(report.csv_path, "output.csv");
        assert_eq!(report.rows_loaded, 1);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.queries.len(), 2);
        assert_eq!(report.queries[1].0, "SELECT 2");
        assert_eq!(
            log.entries(),
            vec![
                STAGE_START,
                STAGE_EXTRACTED,
                STAGE_TRANSFORMED,
                STAGE_CSV_LOADED,
                STAGE_DB_LOADED,
                STAGE_DONE
            ]
        );
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform", "load_csv", "load_store", "query", "query"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_at_failed_transform() {
        let log = MemoryProgressLog::new();
        let pipeline = ScriptedPipeline {
            fail_transform: true,
            ..Default::default()
        };
        let engine = EtlEngine::new(pipeline, log.clone());

        let result = engine.run(&[]).await;

        assert!(matches!(result, Err(EtlError::MissingRateError { .. })));
        assert_eq!(log.entries(), vec![STAGE_START, STAGE_EXTRACTED]);
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
