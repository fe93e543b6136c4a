pub mod etl;
pub mod extract;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{BankRecord, BankTable, EnrichedBankRecord, Extraction};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
