use crate::domain::model::{BankRecord, BankTable, Extraction, QueryResult, TableCell};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Retrieves the raw source document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Turns a document into the cell lists of its first table body.
pub trait TableParser: Send + Sync {
    fn parse(&self, document: &str) -> Result<Vec<Vec<TableCell>>>;
}

/// Write-only audit trail of pipeline stages.
pub trait ProgressLog: Send + Sync {
    fn record_stage(&self, message: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn table_attribs(&self) -> &[String];
    fn exchange_rate_path(&self) -> &str;
    fn csv_path(&self) -> &str;
    fn table_name(&self) -> &str;
    fn queries(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, data: Vec<BankRecord>) -> Result<BankTable>;
    async fn load_csv(&self, table: &BankTable) -> Result<String>;
    async fn load_store(&self, table: BankTable) -> Result<usize>;
    async fn query(&self, statement: &str) -> Result<QueryResult>;
}
