//! Advisor table reader.
//!
//! Parses a CSV table with a header row into an ordered list of
//! [`AdvisorRecord`]s. Parsing is permissive: short or long rows are
//! accepted and any field that is absent reads as an empty string.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, instrument, warn};

use advisorboard_shared::{AdvisorBoardError, AdvisorRecord, ColumnsConfig, Result};

/// Read and parse the advisor table at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_table(path: &Path, columns: &ColumnsConfig) -> Result<Vec<AdvisorRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            AdvisorBoardError::parse(path, "table is not valid UTF-8")
        } else {
            AdvisorBoardError::read(path, e)
        }
    })?;

    let records = parse_table(&text, columns, path)?;
    info!(records = records.len(), "read advisor table");
    Ok(records)
}

/// Parse table text. `origin` is only used for error context.
pub fn parse_table(
    text: &str,
    columns: &ColumnsConfig,
    origin: &Path,
) -> Result<Vec<AdvisorRecord>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| AdvisorBoardError::parse(origin, e.to_string()))?
        .clone();

    let name_idx = column_index(&headers, &columns.name);
    let count_idx = column_index(&headers, &columns.count);
    if name_idx.is_none() {
        warn!(column = %columns.name, "name column missing from header, no rows will be read");
    }
    if count_idx.is_none() {
        warn!(column = %columns.count, "count column missing from header, counts default to 0");
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| AdvisorBoardError::parse(origin, e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let name = field(&row, name_idx).trim();
        if name.is_empty() {
            debug!(line, "skipping row without a name");
            continue;
        }

        let count = parse_count(field(&row, count_idx));
        debug!(line, name, count, "read advisor");
        records.push(AdvisorRecord::new(name, count));
    }

    Ok(records)
}

/// Interpret a count field. Anything that is not a run of ASCII digits is 0.
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }

    trimmed.parse::<u64>().unwrap_or_else(|_| {
        warn!(value = trimmed, "count does not fit in 64 bits, using 0");
        0
    })
}

/// A label repeated in the header resolves to its last column.
fn column_index(headers: &StringRecord, label: &str) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| *h == label)
        .map(|(i, _)| i)
        .last()
}

fn field(row: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<AdvisorRecord> {
        parse_table(text, &ColumnsConfig::default(), Path::new("test.csv")).expect("parse")
    }

    #[test]
    fn drops_blank_names_and_defaults_bad_counts() {
        let records = parse("Name,Count\nAna,7\nLuis,\n,9\nCarla,abc");
        assert_eq!(
            records,
            vec![
                AdvisorRecord::new("Ana", 7),
                AdvisorRecord::new("Luis", 0),
                AdvisorRecord::new("Carla", 0),
            ]
        );
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse("Name,Count\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn trims_names_and_counts() {
        let records = parse("Name,Count\n  Ana María  ,  12 \n   ,4\n");
        assert_eq!(records, vec![AdvisorRecord::new("Ana María", 12)]);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let records = parse("Name,Count\nZoe,1\nAna,2\nZoe,3\n");
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Zoe", "Ana", "Zoe"]);
        assert_eq!(records[2].count, 3);
    }

    #[test]
    fn tolerates_ragged_rows_and_extra_columns() {
        let records = parse("Region,Name,Count,Notes\nNorth,Ana,5,x\nSouth,Luis\nEast\n");
        assert_eq!(
            records,
            vec![AdvisorRecord::new("Ana", 5), AdvisorRecord::new("Luis", 0)]
        );
    }

    #[test]
    fn header_labels_are_case_sensitive() {
        assert!(parse("name,count\nAna,5\n").is_empty());
    }

    #[test]
    fn duplicate_header_uses_last_column() {
        let records = parse("Name,Count,Count\nAna,1,9\nLuis,2,\n");
        assert_eq!(
            records,
            vec![AdvisorRecord::new("Ana", 9), AdvisorRecord::new("Luis", 0)]
        );
    }

    #[test]
    fn missing_count_column_defaults_to_zero() {
        let records = parse("Name\nAna\nLuis\n");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.count == 0));
    }

    #[test]
    fn custom_column_labels() {
        let columns = ColumnsConfig {
            name: "Nombre".into(),
            count: "Domiciliaciones".into(),
        };
        let records = parse_table(
            "Nombre,Domiciliaciones\nAna,3\n",
            &columns,
            Path::new("datos.csv"),
        )
        .unwrap();
        assert_eq!(records, vec![AdvisorRecord::new("Ana", 3)]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let records = parse("\u{feff}Name,Count\nAna,2\n");
        assert_eq!(records, vec![AdvisorRecord::new("Ana", 2)]);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let records = parse("Name,Count\n\"Pérez, Ana\",4\n");
        assert_eq!(records, vec![AdvisorRecord::new("Pérez, Ana", 4)]);
    }

    #[test]
    fn parse_count_rules() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count(" 007 "), 7);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count("+3"), 0);
        assert_eq!(parse_count("1.5"), 0);
        assert_eq!(parse_count("1e3"), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("99999999999999999999999"), 0);
    }

    #[test]
    fn read_table_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("datos.csv");
        let err = read_table(&path, &ColumnsConfig::default()).unwrap_err();
        assert_eq!(err.missing_path(), Some(path.as_path()));
    }

    #[test]
    fn read_table_rejects_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("datos.csv");
        std::fs::write(&path, b"Name,Count\n\xff\xfe,1\n").unwrap();
        let err = read_table(&path, &ColumnsConfig::default()).unwrap_err();
        assert!(matches!(err, AdvisorBoardError::Parse { .. }));
    }

    #[test]
    fn read_table_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("datos.csv");
        std::fs::write(&path, "Name,Count\r\nAna,7\r\nLuis,3\r\n").unwrap();
        let records = read_table(&path, &ColumnsConfig::default()).unwrap();
        assert_eq!(
            records,
            vec![AdvisorRecord::new("Ana", 7), AdvisorRecord::new("Luis", 3)]
        );
    }
}
