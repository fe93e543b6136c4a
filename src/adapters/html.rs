use crate::domain::model::{Link, TableCell};
use crate::domain::ports::TableParser;
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

/// Reads the first `<tbody>` of a document. Rows and cells are matched as
/// descendants, so cells of nested tables are included in their outer row.
#[derive(Debug, Clone, Default)]
pub struct HtmlTableParser;

impl HtmlTableParser {
    pub fn new() -> Self {
        Self
    }
}

fn selector(pattern: &str) -> Result<Selector> {
    Selector::parse(pattern).map_err(|e| EtlError::HtmlParseError {
        message: format!("invalid selector {:?}: {:?}", pattern, e),
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn leading_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .next()
        .map(|text| text.trim_end().to_string())
        .unwrap_or_default()
}

impl TableParser for HtmlTableParser {
    fn parse(&self, document: &str) -> Result<Vec<Vec<TableCell>>> {
        let tbody = selector("tbody")?;
        let tr = selector("tr")?;
        let td = selector("td")?;
        let a = selector("a")?;

        let html = Html::parse_document(document);
        let body = html
            .select(&tbody)
            .next()
            .ok_or_else(|| EtlError::HtmlParseError {
                message: "document has no table body".to_string(),
            })?;

        let rows: Vec<Vec<TableCell>> = body
            .select(&tr)
            .map(|row| {
                row.select(&td)
                    .map(|cell| TableCell {
                        text: element_text(&cell),
                        leading_text: leading_text(&cell),
                        links: cell
                            .select(&a)
                            .map(|link| Link {
                                title: link.value().attr("title").map(str::to_string),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .collect();

        tracing::debug!("Parsed {} rows from first table body", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
<html><body>
<table class="wikitable">
<tbody>
<tr><th>Rank</th><th>Bank name</th><th>Market cap<br/>(US$ billion)</th></tr>
<tr><td>1</td><td><span class="flagicon"><a href="/wiki/United_States" title="United States"><img src="flag.png"/></a></span> <a href="/wiki/JPMorgan_Chase" title="JPMorgan Chase">JPMorgan Chase</a></td><td>432.92
</td></tr>
<tr><td>2</td><td><a href="/wiki/China">CN</a> <a title="Bank B">Bank B</a></td><td>—</td></tr>
</tbody>
</table>
<table><tbody><tr><td>other</td></tr></tbody></table>
</body></html>
"#;

    #[test]
    fn test_parse_first_table_body() {
        let rows = HtmlTableParser::new().parse(FIXTURE).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty(), "header row has no <td> cells");

        let first = &rows[1];
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].text, "1");
        assert_eq!(first[2].text, "432.92");
        assert_eq!(first[2].leading_text, "432.92");
        assert_eq!(first[1].links.len(), 2);
        assert_eq!(first[1].links[0].title.as_deref(), Some("United States"));
        assert_eq!(first[1].links[1].title.as_deref(), Some("JPMorgan Chase"));

        let second = &rows[2];
        assert_eq!(second[1].links[0].title, None);
        assert_eq!(second[2].text, "—");
    }

    #[test]
    fn test_footnoted_cell_keeps_leading_value() {
        let document = r##"<table><tbody>
<tr><td>1</td><td><a title="US">US</a> <a title="JPMorgan Chase">JPMorgan Chase</a></td><td>432.92<sup class="reference"><a href="#cite_note-1">[1]</a></sup>
</td></tr>
</tbody></table>"##;
        let rows = HtmlTableParser::new().parse(document).unwrap();

        let market_cap = &rows[0][2];
        assert_eq!(market_cap.text, "432.92[1]");
        assert_eq!(market_cap.leading_text, "432.92");
        assert_eq!(market_cap.links.len(), 1);
    }

    #[test]
    fn test_document_without_table_body() {
        let result = HtmlTableParser::new().parse("<html><body><p>moved</p></body></html>");
        assert!(matches!(result, Err(EtlError::HtmlParseError { .. })));
    }
}
