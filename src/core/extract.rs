use crate::domain::model::{BankRecord, Extraction, SkipReason, SkippedRow, TableCell};
use crate::utils::error::EtlError;

/// Marker the source uses for an unknown market cap.
pub const MISSING_VALUE_MARKER: char = '—';

const NAME_CELL: usize = 1;
const MARKET_CAP_CELL: usize = 2;
/// The first link in the name cell is the flag icon; the bank link follows it.
const NAME_LINK: usize = 1;

/// Interprets one `<tr>`. `None` means the row carries no data cells at all.
pub fn interpret_row(cells: &[TableCell]) -> Option<Result<BankRecord, SkipReason>> {
    if cells.is_empty() {
        return None;
    }
    if cells.len() <= MARKET_CAP_CELL {
        return Some(Err(SkipReason::TooFewCells(cells.len())));
    }

    let market_cap = &cells[MARKET_CAP_CELL];
    if market_cap.text.contains(MISSING_VALUE_MARKER) {
        return Some(Err(SkipReason::MissingValue));
    }

    // Only the leading text node holds the value; footnote markers follow it.
    let value = market_cap.leading_text.trim();
    let market_cap_usd = match value.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => return Some(Err(SkipReason::NotANumber(value.to_string()))),
    };

    let name = cells[NAME_CELL]
        .links
        .get(NAME_LINK)
        .and_then(|link| link.title.as_deref())
        .map(|title| title.trim_end().to_string());

    Some(match name {
        Some(name) => Ok(BankRecord {
            name,
            market_cap_usd,
        }),
        None => Err(SkipReason::MissingNameLink),
    })
}

/// Builds the extracted table from parsed rows, keeping source order.
/// Malformed rows are dropped and reported, never fatal.
pub fn interpret_rows(rows: &[Vec<TableCell>]) -> Extraction {
    let mut extraction = Extraction::default();

    for (row, cells) in rows.iter().enumerate() {
        match interpret_row(cells) {
            None => {}
            Some(Ok(record)) => extraction.records.push(record),
            Some(Err(reason)) => {
                match &reason {
                    SkipReason::NotANumber(value) => {
                        let error = EtlError::RowParseError {
                            row,
                            value: value.clone(),
                        };
                        tracing::warn!("Skipping row: {}", error);
                    }
                    other => tracing::debug!("Skipping row {}: {:?}", row, other),
                }
                extraction.skipped.push(SkippedRow { row, reason });
            }
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Link;

    fn name_cell(title: &str) -> TableCell {
        TableCell {
            links: vec![
                Link { title: None },
                Link {
                    title: Some(title.to_string()),
                },
            ],
            ..TableCell::text(title)
        }
    }

    fn bank_row(name: &str, market_cap: &str) -> Vec<TableCell> {
        vec![TableCell::text("1"), name_cell(name), TableCell::text(market_cap)]
    }

    #[test]
    fn test_valid_row() {
        let record = interpret_row(&bank_row("JPMorgan Chase", "432.92")).unwrap().unwrap();
        assert_eq!(record.name, "JPMorgan Chase");
        assert_eq!(record.market_cap_usd, 432.92);
    }

    #[test]
    fn test_name_trailing_whitespace_trimmed() {
        let record = interpret_row(&bank_row("Bank of America \n", "231.52")).unwrap().unwrap();
        assert_eq!(record.name, "Bank of America");
    }

    #[test]
    fn test_header_row_ignored() {
        assert!(interpret_row(&[]).is_none());
    }

    #[test]
    fn test_non_numeric_market_cap_skipped() {
        let outcome = interpret_row(&bank_row("Bank C", "n/a")).unwrap();
        assert_eq!(outcome, Err(SkipReason::NotANumber("n/a".to_string())));
    }

    #[test]
    fn test_missing_value_marker_skipped() {
        let row = vec![
            TableCell::text(""),
            name_cell("Bank B"),
            TableCell::text("—"),
        ];
        assert_eq!(interpret_row(&row).unwrap(), Err(SkipReason::MissingValue));
    }

    #[test]
    fn test_missing_name_link_skipped() {
        let row = vec![
            TableCell::text("3"),
            TableCell {
                links: vec![Link {
                    title: Some("Bank D".to_string()),
                }],
                ..TableCell::text("Bank D")
            },
            TableCell::text("100.0"),
        ];
        assert_eq!(interpret_row(&row).unwrap(), Err(SkipReason::MissingNameLink));
    }

    #[test]
    fn test_second_link_without_title_skipped() {
        let mut row = bank_row("Bank E", "12.5");
        row[1].links[1].title = None;
        assert_eq!(interpret_row(&row).unwrap(), Err(SkipReason::MissingNameLink));
    }

    #[test]
    fn test_short_row_skipped() {
        let row = vec![TableCell::text("1"), name_cell("Bank F")];
        assert_eq!(interpret_row(&row).unwrap(), Err(SkipReason::TooFewCells(2)));
    }

    #[test]
    fn test_footnoted_market_cap_uses_leading_text() {
        let mut row = bank_row("JPMorgan Chase", "432.92[1]");
        row[2].leading_text = "432.92".to_string();

        let record = interpret_row(&row).unwrap().unwrap();
        assert_eq!(record.market_cap_usd, 432.92);
    }

    #[test]
    fn test_marker_after_leading_text_still_skips() {
        let mut row = bank_row("Bank B", "n/a —");
        row[2].leading_text = "n/a".to_string();
        assert_eq!(interpret_row(&row).unwrap(), Err(SkipReason::MissingValue));
    }

    #[test]
    fn test_interpret_rows_drops_marked_rows_and_keeps_order() {
        let rows = vec![
            vec![],
            bank_row("Bank A", "100.0"),
            bank_row("Bank B", "—"),
            bank_row("Bank C", "50.5"),
            bank_row("Bank D", "—"),
            bank_row("Bank E", "7"),
        ];
        let data_rows = rows.iter().filter(|r| !r.is_empty()).count();
        let marked = 2;

        let extraction = interpret_rows(&rows);

        assert_eq!(extraction.records.len(), data_rows - marked);
        let names: Vec<&str> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bank A", "Bank C", "Bank E"]);
        assert_eq!(extraction.skipped.len(), 2);
        assert_eq!(extraction.skipped[0].row, 2);
        assert_eq!(extraction.skipped[1].row, 4);
    }

    #[test]
    fn test_interpret_rows_survives_parse_errors() {
        let rows = vec![
            bank_row("Bank A", "abc"),
            bank_row("Bank B", ""),
            bank_row("Bank C", "1.5"),
        ];

        let extraction = interpret_rows(&rows);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Bank C");
        assert!(extraction
            .skipped
            .iter()
            .all(|s| matches!(s.reason, SkipReason::NotANumber(_))));
    }
}
