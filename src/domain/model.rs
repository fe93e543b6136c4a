use serde::{Deserialize, Serialize};
use std::fmt;

/// Output columns, in file and table order.
pub const COLUMNS: [&str; 5] = [
    "Name",
    "MC_USD_Billion",
    "MC_GBP_Billion",
    "MC_EUR_Billion",
    "MC_INR_Billion",
];

/// Columns produced by extraction, before any conversion.
pub const EXTRACTED_COLUMNS: [&str; 2] = ["Name", "MC_USD_Billion"];

#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub name: String,
    pub market_cap_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingValue,
    NotANumber(String),
    MissingNameLink,
    TooFewCells(usize),
}

/// A source row left out of the extracted table.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Zero-based index among the table body's `<tr>` elements.
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub records: Vec<BankRecord>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBankRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub market_cap_usd: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub market_cap_gbp: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub market_cap_eur: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub market_cap_inr: f64,
}

/// Enriched rows in source document order.
pub type BankTable = Vec<EnrichedBankRecord>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub title: Option<String>,
}

/// One `<td>` as seen by the row interpreter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    /// All text inside the cell, trimmed.
    pub text: String,
    /// The cell's first text node with trailing whitespace removed. Footnote
    /// markup that follows the value (`432.92<sup>[1]</sup>`) is not part of it.
    pub leading_text: String,
    pub links: Vec<Link>,
}

#[cfg(test)]
impl TableCell {
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            leading_text: text.clone(),
            text,
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Integer(v) => Some(*v as f64),
            SqlValue::Real(v) => Some(*v),
            _ => None,
        }
    }

}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(v) => write!(f, "{}", v),
            SqlValue::Real(v) => write!(f, "{:?}", v),
            SqlValue::Text(v) => write!(f, "{}", v),
            SqlValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

/// Renders an aligned table with a leading row index, text left-aligned and
/// numbers right-aligned.
impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i).map(|c| c.chars().count()))
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name, width = *width)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", i)?;
            for ((value, text), width) in row.iter().zip(&cells[i]).zip(&widths) {
                match value {
                    SqlValue::Text(_) => write!(f, "  {:<width$}", text, width = *width)?,
                    _ => write!(f, "  {:>width$}", text, width = *width)?,
                }
            }
        }
        Ok(())
    }
}
