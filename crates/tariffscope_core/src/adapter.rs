//! Conversion of comma-delimited table files into [`Grid`], [`Metadata`] and [`Table`].
//!
//! Grid files carry the step ids in the header row (after the first column)
//! and one group per following row. Metadata files are two-column key/value
//! rows after a header; extra columns are ignored.

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::model::{Grid, Metadata, Table};

/// Split comma-delimited text into trimmed rows.
///
/// Rows may have differing lengths. Blank lines are skipped.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, csv::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Build a grid from parsed rows; the first row is the step header.
pub fn grid_from_rows(rows: &[Vec<String>]) -> Grid {
    let Some((header, body)) = rows.split_first() else {
        return Grid::default();
    };
    let steps = header.iter().skip(1).cloned().collect();
    let mut grid = Grid::with_steps(steps);
    for row in body {
        let Some((group, values)) = row.split_first() else {
            continue;
        };
        grid.insert_row(group.clone(), values.to_vec());
    }
    grid
}

/// Build metadata from parsed rows, skipping the header row.
pub fn metadata_from_rows(rows: &[Vec<String>]) -> Metadata {
    rows.iter()
        .skip(1)
        .filter(|row| row.len() > 1)
        .map(|row| (row[0].clone(), row[1].clone()))
        .collect()
}

pub fn parse_grid(text: &str) -> Result<Grid, csv::Error> {
    parse_rows(text).map(|rows| grid_from_rows(&rows))
}

pub fn parse_metadata(text: &str) -> Result<Metadata, csv::Error> {
    parse_rows(text).map(|rows| metadata_from_rows(&rows))
}

/// Assemble a table from the text of its `Table.csv`, `Adv.csv` and `Meta.csv`.
pub fn parse_table(
    name: &str,
    table_csv: &str,
    adv_csv: &str,
    meta_csv: &str,
) -> Result<Table, csv::Error> {
    Ok(Table::new(
        name,
        parse_grid(table_csv)?,
        parse_grid(adv_csv)?,
        parse_metadata(meta_csv)?,
    ))
}

/// Serialize a grid back to comma-delimited text with a `group` corner cell.
pub fn grid_to_csv(grid: &Grid) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["group"];
    header.extend(grid.steps().iter().map(String::as_str));
    writer.write_record(&header)?;
    for row in grid.rows() {
        let mut record = vec![row.group.as_str()];
        record.extend(row.values.iter().map(String::as_str));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "EG,1,2,3\nE5,2500.00,2610.10,2700\nE9, 3100 ,3300,\n";
    const META: &str = "key,value\nvalid_from,2024-03-01\njsz_percent,80,ignored\nlonely\n";

    #[test]
    fn test_grid_from_csv() {
        let grid = parse_grid(TABLE).unwrap();
        assert_eq!(grid.steps(), &["1", "2", "3"]);
        assert_eq!(grid.get("E5", "2"), Some("2610.10"));
        assert_eq!(grid.get("E9", "1"), Some("3100"));
        assert_eq!(grid.get("E9", "3"), Some(""));
    }

    #[test]
    fn test_metadata_uses_first_two_columns() {
        let meta = parse_metadata(META).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("valid_from"), Some("2024-03-01"));
        assert_eq!(meta.get("jsz_percent"), Some("80"));
        assert_eq!(meta.get("key"), None);
    }

    #[test]
    fn test_blank_lines_crlf_and_bom() {
        let text = "\u{feff}EG,1\r\n\r\nE1,100\r\n";
        let grid = parse_grid(text).unwrap();
        assert_eq!(grid.steps(), &["1"]);
        assert_eq!(grid.number("E1", "1"), Some(100.0));
        assert_eq!(grid.rows().len(), 1);
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_grid("").unwrap().is_empty());
        assert!(parse_metadata("").unwrap().is_empty());
    }

    #[test]
    fn test_grid_round_trip_keeps_values() {
        // Quoted decimal commas survive the writer and normalize on read.
        let text = "EG,1,2\nE1,\"1000,5\",1100\nE2,1200,\n";
        let grid = parse_grid(text).unwrap();
        let written = grid_to_csv(&grid).unwrap();
        let reread = parse_grid(&written).unwrap();

        for row in grid.rows() {
            for step in grid.steps() {
                assert_eq!(
                    grid.number(&row.group, step),
                    reread.number(&row.group, step),
                    "mismatch at {}/{}",
                    row.group,
                    step
                );
            }
        }
        assert_eq!(reread.number("E1", "1"), Some(1000.5));
    }

    #[test]
    fn test_parse_table() {
        let table = parse_table("TV-L", TABLE, "EG,1,2\nE5,1,2\n", META).unwrap();
        assert_eq!(table.name, "TV-L");
        assert_eq!(table.duration("E5", "2"), Some(2.0));
        assert_eq!(table.metadata.valid_from(), Some("2024-03-01"));
    }
}
