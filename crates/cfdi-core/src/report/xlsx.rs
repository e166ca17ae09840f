//! Excel workbook report store.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};

use super::{ReportStore, Result};
use crate::error::ReportError;
use crate::models::dataset::{Cell, Dataset};

/// Reads the first worksheet of a workbook and writes a single-sheet `.xlsx`.
///
/// Numbers are written as numeric cells so totals stay summable in Excel.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReport;

impl XlsxReport {
    pub fn new() -> Self {
        Self
    }
}

impl ReportStore for XlsxReport {
    fn read(&self, path: &Path) -> Result<Dataset> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| ReportError::Xlsx(format!("failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let Some(first) = sheet_names.first() else {
            return Err(ReportError::Xlsx("workbook contains no sheets".to_string()));
        };

        let range = workbook
            .worksheet_range(first)
            .map_err(|e| ReportError::Xlsx(format!("failed to read sheet '{}': {}", first, e)))?;

        let mut rows = range.rows();
        let columns = match rows.next() {
            Some(header) => header.iter().map(|h| h.to_string()).collect(),
            None => return Ok(Dataset::new()),
        };

        let rows = rows
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        Ok(Dataset::from_parts(columns, rows))
    }

    fn write(&self, path: &Path, dataset: &Dataset) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let header_format = Format::new().set_bold();
        let amount_format = Format::new().set_num_format("0.00");

        for (col, name) in dataset.columns().iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, name, &header_format)
                .map_err(xlsx_error)?;
        }

        for (row_idx, row) in dataset.rows().iter().enumerate() {
            let row32 = (row_idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col16 = col as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(row32, col16, s).map_err(xlsx_error)?;
                    }
                    Cell::Number(n) => {
                        let value = n.to_f64().unwrap_or_default();
                        worksheet
                            .write_number_with_format(row32, col16, value, &amount_format)
                            .map_err(xlsx_error)?;
                    }
                }
            }
        }

        worksheet.autofit();
        workbook.save(path).map_err(xlsx_error)?;
        Ok(())
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Number(Decimal::from(*n)),
        Data::Float(f) => match Decimal::from_f64(*f) {
            Some(n) => Cell::Number(n),
            None => Cell::Text(f.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> ReportError {
    ReportError::Xlsx(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.xlsx");

        let dataset = Dataset::from_parts(
            vec!["UUID".to_string(), "Total".to_string(), "Notas".to_string()],
            vec![
                vec![
                    Cell::Text("U-1".to_string()),
                    Cell::Number(Decimal::new(116050, 2)),
                    Cell::Empty,
                ],
                vec![
                    Cell::Text("ERROR".to_string()),
                    Cell::Number(Decimal::ZERO),
                    Cell::Text("revisar".to_string()),
                ],
            ],
        );

        XlsxReport::new().write(&path, &dataset).unwrap();
        let loaded = XlsxReport::new().read(&path).unwrap();

        assert_eq!(loaded.columns(), dataset.columns());
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rows()[0][0], Cell::Text("U-1".to_string()));
        assert_eq!(loaded.rows()[0][1], Cell::Number(Decimal::new(116050, 2)));
        assert_eq!(loaded.rows()[0][2], Cell::Empty);
        assert_eq!(loaded.rows()[1][2], Cell::Text("revisar".to_string()));
    }

    #[test]
    fn test_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        assert!(matches!(XlsxReport::new().read(&path), Err(ReportError::Xlsx(_))));
    }
}
