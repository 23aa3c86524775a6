//! Tabular data source: named columns, loaded from CSV or built in code.

use crate::error::{PlotError, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// One column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Floating-point values; missing cells are NaN.
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_) => None,
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Numeric(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Text(v)
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::Text(v.into_iter().map(str::to_string).collect())
    }
}

/// Columns addressable by name, all of the same length, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<(String, Column)>,
}

impl DataFrame {
    /// Build from `(name, column)` pairs. Later duplicates replace earlier ones.
    pub fn from_columns<N, C, I>(columns: I) -> Result<Self>
    where
        N: Into<String>,
        C: Into<Column>,
        I: IntoIterator<Item = (N, C)>,
    {
        let mut df = DataFrame::default();
        for (name, col) in columns {
            df.insert(name, col)?;
        }
        Ok(df)
    }

    /// Add or replace a column. Its length must match the existing rows.
    pub fn insert(&mut self, name: impl Into<String>, col: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let col = col.into();
        if let Some((_, first)) = self.columns.first()
            && first.len() != col.len()
        {
            return Err(PlotError::LengthMismatch {
                x: first.len(),
                y: col.len(),
            });
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = col,
            None => self.columns.push((name, col)),
        }
        Ok(())
    }

    /// Load a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        Self::from_csv(rdr)
    }

    /// Load CSV with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        Self::from_csv(rdr)
    }

    fn from_csv<R: Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (i, cell) in record.iter().enumerate() {
                cells[i].push(cell.to_string());
            }
        }
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| (name, infer_column(raw)));
        Self::from_columns(columns)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| PlotError::ColumnNotFound(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| PlotError::NonNumericColumn(name.to_string()))
    }
}

/// A column is numeric when every non-empty cell parses as `f64` and at
/// least one cell is non-empty.
fn infer_column(raw: Vec<String>) -> Column {
    let mut any = false;
    let mut values = Vec::with_capacity(raw.len());
    for cell in &raw {
        if cell.is_empty() {
            values.push(f64::NAN);
            continue;
        }
        match cell.parse::<f64>() {
            Ok(v) => {
                any = true;
                values.push(v);
            }
            Err(_) => return Column::Text(raw),
        }
    }
    if any {
        Column::Numeric(values)
    } else {
        Column::Text(raw)
    }
}
