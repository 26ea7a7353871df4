//! CSV Loader
//!
//! Reads the source CSV once, drops incomplete rows and derives the age
//! columns. The resulting `Dataset` is immutable.

use super::error::{DatasetError, DatasetResult};
use super::types::{CellValue, Column, Record};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Cell contents treated as a missing value, matched exactly
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// The cleaned, in-memory dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Source column names in header order
    columns: Vec<String>,
    /// Rows that survived cleaning, in file order
    records: Vec<Record>,
    /// Rows removed because of missing or non-numeric values
    dropped_rows: usize,
}

impl Dataset {
    /// Load and clean the CSV at `path`
    pub fn load(path: &Path) -> DatasetResult<Self> {
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            dropped = dataset.dropped_rows,
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Load from a CSV string (useful for testing)
    pub fn from_csv_str(csv_data: &str) -> DatasetResult<Self> {
        Self::from_reader(csv_data.as_bytes())
    }

    /// Parse and clean CSV from any reader
    ///
    /// A column keeps integer cells only when every cell of it, dropped rows
    /// included, is an integer; otherwise its numbers are floats.
    pub fn from_reader<R: Read>(source: R) -> DatasetResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(source);

        let columns = dedupe_headers(reader.headers()?.iter());

        let position = |column: Column| {
            columns
                .iter()
                .position(|c| c == column.as_str())
                .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))
        };
        let height_idx = position(Column::Height)?;
        let weight_idx = position(Column::Weight)?;
        let age_idx = position(Column::Age)?;

        // Ragged or undecodable rows make the whole file unusable
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        let integral: Vec<bool> = (0..columns.len())
            .map(|idx| {
                rows.iter()
                    .all(|row| row.get(idx).is_some_and(|cell| CellValue::parse(cell).is_integer()))
            })
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        let mut dropped_rows = 0;

        for (line_num, row) in rows.iter().enumerate() {
            let line = line_num + 2;

            if row.iter().any(is_missing) {
                tracing::debug!(line, "Dropping row with missing values");
                dropped_rows += 1;
                continue;
            }

            let fields: Vec<(String, CellValue)> = columns
                .iter()
                .zip(row.iter())
                .zip(&integral)
                .map(|((name, raw), &integral)| {
                    let cell = CellValue::parse(raw);
                    let cell = if integral { cell } else { cell.into_float() };
                    (name.clone(), cell)
                })
                .collect();

            let numeric = |idx: usize| fields[idx].1.as_f64();
            match (numeric(height_idx), numeric(weight_idx), numeric(age_idx)) {
                (Some(height), Some(weight), Some(age)) => {
                    records.push(Record::new(fields, height, weight, age));
                }
                _ => {
                    tracing::warn!(line, "Dropping row with non-numeric Height, Weight or Age");
                    dropped_rows += 1;
                }
            }
        }

        Ok(Self {
            columns,
            records,
            dropped_rows,
        })
    }

    /// Source column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// All values of a numeric column, in row order
    pub fn values(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Rename repeated header names to `name.1`, `name.2`, ... so every column
/// stays addressable. The first occurrence keeps its name.
fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();

    for name in names {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}
