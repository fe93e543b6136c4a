use crate::adapters::sqlite::BankStore;
use crate::core::extract::interpret_rows;
use crate::core::transform::enrich;
use crate::core::{BankRecord, BankTable, ConfigProvider, Extraction, Pipeline, Storage};
use crate::domain::model::{QueryResult, COLUMNS};
use crate::domain::ports::{DocumentSource, TableParser};
use crate::domain::rates::ExchangeRateTable;
use crate::utils::error::{EtlError, Result};

pub struct BanksPipeline<D, P, S, C>
where
    D: DocumentSource,
    P: TableParser,
    S: Storage,
    C: ConfigProvider,
{
    source: D,
    parser: P,
    storage: S,
    config: C,
    store: BankStore,
}

impl<D, P, S, C> BanksPipeline<D, P, S, C>
where
    D: DocumentSource,
    P: TableParser,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(source: D, parser: P, storage: S, config: C, store: BankStore) -> Self {
        Self {
            source,
            parser,
            storage,
            config,
            store,
        }
    }
}

/// Serializes the table with a header row, written even when the table is empty.
pub fn to_csv_bytes(table: &BankTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in table {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<D, P, S, C> Pipeline for BanksPipeline<D, P, S, C>
where
    D: DocumentSource,
    P: TableParser,
    S: Storage,
    C: ConfigProvider,
{
    async fn extract(&self) -> Result<Extraction> {
        let location = self.config.source_url();
        tracing::debug!(
            "Extracting columns {:?} from {}",
            self.config.table_attribs(),
            location
        );

        let document = self.source.fetch(location).await?;
        let rows = self.parser.parse(&document)?;
        let extraction = interpret_rows(&rows);

        if !extraction.skipped.is_empty() {
            tracing::info!("Skipped {} source rows", extraction.skipped.len());
        }
        if extraction.records.is_empty() {
            return Err(EtlError::EmptyExtraction {
                location: location.to_string(),
            });
        }

        Ok(extraction)
    }

    async fn transform(&self, data: Vec<BankRecord>) -> Result<BankTable> {
        let rates_path = self.config.exchange_rate_path();
        tracing::debug!("Reading exchange rates from {}", rates_path);

        let bytes = self.storage.read_file(rates_path).await?;
        let rates = ExchangeRateTable::from_csv_bytes(&bytes)?;
        enrich(data, &rates)
    }

    async fn load_csv(&self, table: &BankTable) -> Result<String> {
        let path = self.config.csv_path();
        let data = to_csv_bytes(table)?;

        tracing::debug!("Writing {} rows ({} bytes) to {}", table.len(), data.len(), path);
        self.storage.write_file(path, &data).await?;
        Ok(path.to_string())
    }

    async fn load_store(&self, table: BankTable) -> Result<usize> {
        self.store.load(&table, self.config.table_name()).await
    }

    async fn query(&self, statement: &str) -> Result<QueryResult> {
        self.store.query(statement).await
    }
}
