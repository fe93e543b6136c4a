use crate::utils::error::{EtlError, Result};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Currency code to units of that currency per one USD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeRateTable {
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// Parses a `Currency,Rate` CSV document. A repeated currency keeps its
    /// last rate.
    pub fn from_csv_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut rates = HashMap::new();
        for row in reader.deserialize::<RateRow>() {
            let row = row?;
            if !row.rate.is_finite() || row.rate <= 0.0 {
                return Err(EtlError::ProcessingError {
                    message: format!("Exchange rate for {} must be positive, got {}", row.currency, row.rate),
                });
            }
            rates.insert(row.currency, row.rate);
        }

        tracing::debug!("Loaded {} exchange rates", rates.len());
        Ok(Self { rates })
    }

    pub fn rate(&self, currency: &str) -> Result<f64> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| EtlError::MissingRateError {
                currency: currency.to_string(),
            })
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ExchangeRateTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Rounds to two decimals: the value is scaled by 100 and ties go to the
/// even neighbour, so `0.125` becomes `0.12` and `0.375` becomes `0.38`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_csv() {
        let csv = b"Currency,Rate\nEUR,0.93\nGBP,0.8\nINR,82.95\n";
        let table = ExchangeRateTable::from_csv_bytes(csv).unwrap();

        assert_eq!(table.rate("EUR").unwrap(), 0.93);
        assert_eq!(table.rate("GBP").unwrap(), 0.8);
        assert_eq!(table.rate("INR").unwrap(), 82.95);
    }

    #[test]
    fn test_missing_currency() {
        let table: ExchangeRateTable = [("GBP", 0.8), ("EUR", 0.93)].into_iter().collect();

        match table.rate("INR") {
            Err(EtlError::MissingRateError { currency }) => assert_eq!(currency, "INR"),
            other => panic!("expected MissingRateError, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let csv = b"Currency,Rate\nGBP,0\n";
        assert!(ExchangeRateTable::from_csv_bytes(csv).is_err());

        let csv = b"Currency,Rate\nGBP,-1.5\n";
        assert!(ExchangeRateTable::from_csv_bytes(csv).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_rate() {
        let csv = b"Currency,Rate\nGBP,abc\n";
        assert!(matches!(
            ExchangeRateTable::from_csv_bytes(csv),
            Err(EtlError::CsvError(_))
        ));
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(432.924), 432.92);
        assert_eq!(round2(432.926), 432.93);
    }
}
