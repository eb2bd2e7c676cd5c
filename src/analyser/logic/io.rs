use crate::error::{Result, ResultExt as _, SocialStatsError};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// One input row. Cells are addressed through the owning [`Dataset`]'s header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    cells: Vec<String>,
}

impl Record {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    fn push(&mut self, value: String) {
        self.cells.push(value);
    }
}

/// An all-text table resident in memory.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset from a header row and string rows. Short rows are padded with empty cells.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let width = headers.len();
        let records = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<String> = row.into_iter().map(Into::into).take(width).collect();
                cells.resize(width, String::new());
                Record::new(cells)
            })
            .collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            index,
            records,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Raw cell for `name`, or `None` when the column does not exist.
    pub fn value<'a>(&self, record: &'a Record, name: &str) -> Option<&'a str> {
        self.column_index(name).and_then(|i| record.cell(i))
    }

    /// Appends a column, replacing it if the name already exists.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.records.len() {
            return Err(SocialStatsError::DataProcessing(format!(
                "derived column '{name}' has {} values for {} rows",
                values.len(),
                self.records.len()
            )));
        }
        if let Some(i) = self.column_index(name) {
            for (record, value) in self.records.iter_mut().zip(values) {
                if let Some(cell) = record.cells.get_mut(i) {
                    *cell = value;
                }
            }
        } else {
            self.index.insert(name.to_owned(), self.headers.len());
            self.headers.push(name.to_owned());
            for (record, value) in self.records.iter_mut().zip(values) {
                record.push(value);
            }
        }
        Ok(())
    }
}

/// Reads a CSV export with every column kept as text.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(SocialStatsError::InvalidPath(path.display().to_string()));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(LazyFrame::collect)
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    dataset_from_df(&df)
}

pub fn dataset_from_df(df: &DataFrame) -> Result<Dataset> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(headers.len());
    for col in df.get_columns() {
        let series = col.as_materialized_series().cast(&DataType::String)?;
        let ca = series.str()?;
        columns.push(
            ca.into_iter()
                .map(|v| v.map(str::to_owned).unwrap_or_default())
                .collect(),
        );
    }

    let columns = &columns;
    let rows = (0..df.height()).map(move |row| {
        columns
            .iter()
            .map(move |column| column.get(row).cloned().unwrap_or_default())
    });

    Ok(Dataset::from_rows(headers, rows))
}
