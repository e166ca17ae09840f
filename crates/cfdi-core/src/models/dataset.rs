//! In-memory report table.

use std::fmt;

use rust_decimal::Decimal;

use super::record::{InvoiceRecord, COLUMNS};

/// A single report cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
}

impl Cell {
    /// Check if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

/// An ordered table of named columns.
///
/// Rows loaded from an existing report keep every column they had, including
/// ones this tool never writes. Every row is as wide as `columns`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Create an empty dataset with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from a header row and data rows.
    ///
    /// Short rows are padded with empty cells. Cells past the last header and
    /// blank headers get an `Unnamed: <index>` column, so nothing read from a
    /// file is lost on the next save.
    pub fn from_parts(mut columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).fold(columns.len(), usize::max);
        columns.resize(width, String::new());
        for (index, name) in columns.iter_mut().enumerate() {
            if name.trim().is_empty() {
                *name = unnamed_column(index);
            }
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Build a dataset holding the given records, in order.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a InvoiceRecord>) -> Self {
        let mut dataset = Self::new();
        for record in records {
            dataset.push_record(record);
        }
        dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Append a record as a new row, aligning its values by header name.
    ///
    /// Headers the table lacks are added at the end; earlier rows get empty cells there.
    pub fn push_record(&mut self, record: &InvoiceRecord) {
        let mut row = vec![Cell::Empty; self.columns.len()];

        for (header, cell) in COLUMNS.iter().zip(record.to_cells()) {
            let index = self.ensure_column(header);
            if index >= row.len() {
                row.resize(index + 1, Cell::Empty);
            }
            row[index] = cell;
        }

        self.rows.push(row);
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }

        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Cell::Empty);
        }
        self.columns.len() - 1
    }
}

/// Placeholder header for a column that has data but no name.
fn unnamed_column(index: usize) -> String {
    format!("Unnamed: {}", index)
}
