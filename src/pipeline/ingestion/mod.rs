// Pipeline ingestion: reading spreadsheet rows into header-keyed maps

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

use crate::constants;
use crate::error::{CatalogError, Result};

/// One spreadsheet row keyed by column header.
///
/// Columns are looked up by name; a column missing from the header (or from a
/// short row) is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new(cells: HashMap<String, String>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.cells.insert(column.to_string(), value.to_string());
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.cells.remove(column)
    }

    /// Value of a required column, or `MalformedRow` naming it.
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column).ok_or_else(|| CatalogError::MalformedRow {
            field: column.to_string(),
            title: self.get(constants::TITLE).map(str::to_string),
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Read every row of a CSV document with a header line.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(headers.iter().zip(record.iter()).collect());
    }

    Ok(rows)
}

/// Read every row of the CSV file at `path`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let file = std::fs::File::open(path.as_ref())?;
    let rows = read_rows(file)?;
    debug!(rows = rows.len(), "Read spreadsheet rows");
    crate::observability::metrics::ingest::rows_read(rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_keyed_by_header() {
        let data = "title,director,upc\nAlien,Ridley Scott,\nHeat,Michael Mann,883929\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some("Alien"));
        assert_eq!(rows[0].get("upc"), Some(""));
        assert_eq!(rows[1].get("upc"), Some("883929"));
        assert_eq!(rows[1].get("mpaa"), None);
    }

    #[test]
    fn test_quoted_cells_keep_delimiters() {
        let data = "title,director\n\"Matrix, The\",\"Lana Wachowski,Lilly Wachowski\"\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows[0].get("title"), Some("Matrix, The"));
        assert_eq!(rows[0].get("director"), Some("Lana Wachowski,Lilly Wachowski"));
    }

    #[test]
    fn test_short_row_leaves_trailing_columns_absent() {
        let data = "title,director,mpaa\nAlien,Ridley Scott\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows[0].get("director"), Some("Ridley Scott"));
        assert_eq!(rows[0].get("mpaa"), None);
    }

    #[test]
    fn test_require_reports_column_and_title() {
        let row: Row = [("title", "Alien")].into_iter().collect();
        match row.require("runtime") {
            Err(CatalogError::MalformedRow { field, title }) => {
                assert_eq!(field, "runtime");
                assert_eq!(title.as_deref(), Some("Alien"));
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }
}
