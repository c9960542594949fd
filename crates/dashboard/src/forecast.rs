//! Forecast table loading.
//!
//! Tables are whatever the offline forecasting job wrote. Cells are kept as
//! strings and rows may be ragged; nothing here checks column names or types.

use serde::Serialize;
use std::io::Read;

/// A forecast CSV, possibly truncated to a row limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Data rows in the file, including any that were not kept.
    pub total_rows: usize,
}

impl ForecastTable {
    /// Parse CSV from `reader`, keeping at most `max_rows` data rows.
    pub fn from_reader<R: Read>(reader: R, max_rows: usize) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        let mut total_rows = 0;
        for record in reader.records() {
            let record = record?;
            if rows.len() < max_rows {
                rows.push(record.iter().map(str::to_string).collect());
            }
            total_rows += 1;
        }

        Ok(Self {
            headers,
            rows,
            total_rows,
        })
    }

    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }

    /// Widest row, counting the header row.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}
