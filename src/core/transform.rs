use crate::domain::model::{BankRecord, BankTable, EnrichedBankRecord};
use crate::domain::rates::{round2, ExchangeRateTable};
use crate::utils::error::Result;

/// Adds the GBP, EUR and INR columns. Every required rate is looked up
/// before any row is converted, so a missing rate yields no table at all.
pub fn enrich(records: Vec<BankRecord>, rates: &ExchangeRateTable) -> Result<BankTable> {
    let gbp = rates.rate("GBP")?;
    let eur = rates.rate("EUR")?;
    let inr = rates.rate("INR")?;

    Ok(records
        .into_iter()
        .map(|record| EnrichedBankRecord {
            market_cap_gbp: round2(record.market_cap_usd * gbp),
            market_cap_eur: round2(record.market_cap_usd * eur),
            market_cap_inr: round2(record.market_cap_usd * inr),
            market_cap_usd: record.market_cap_usd,
            name: record.name,
        })
        .collect())
}
