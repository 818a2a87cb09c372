//! Parsing for the delimited text files BLS publishes outside the JSON API.

use std::collections::BTreeMap;

use crate::Error;

/// One record of a delimited file, keyed by header name.
pub type Row = BTreeMap<String, String>;

/// Parses delimited text with a header row. Cells and headers are trimmed;
/// short rows leave the missing columns out, extra cells are dropped.
/// Tab-delimited files are read without quote handling.
pub(crate) fn parse_delimited(text: &str, delimiter: u8) -> Result<Vec<Row>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(delimiter != b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format_error(&e))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format_error(&e))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn format_error(e: &csv::Error) -> Error {
    tracing::error!("Failed to parse delimited file: {}", e);
    Error::ResponseFormat(format!("invalid delimited file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_separated_with_padding() {
        let text = "area_code\tarea_name  \tdisplay_level\n0000 \tU.S. city average\t0\nS100\tNortheast\t0\n";
        let rows = parse_delimited(text, b'\t').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["area_code"], "0000");
        assert_eq!(rows[0]["area_name"], "U.S. city average");
        assert_eq!(rows[1]["area_name"], "Northeast");
    }

    #[test]
    fn quoted_csv_and_short_rows() {
        let text = "area_fips,own_code,area_title\n\"US000\",\"0\",\"U.S. TOTAL\"\n\"01000\",\"5\"\n";
        let rows = parse_delimited(text, b',').unwrap();
        assert_eq!(rows[0]["area_title"], "U.S. TOTAL");
        assert_eq!(rows[1]["own_code"], "5");
        assert!(!rows[1].contains_key("area_title"));
    }

    #[test]
    fn quotes_in_tab_files_are_literal() {
        let rows = parse_delimited("code\ttext\nA\t12\" pipe\n", b'\t').unwrap();
        assert_eq!(rows[0]["text"], "12\" pipe");
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse_delimited("a\tb\n", b'\t').unwrap().is_empty());
        assert!(parse_delimited("", b'\t').unwrap().is_empty());
    }
}
