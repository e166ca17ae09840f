//! CSV report store.

use std::path::Path;

use super::{ReportStore, Result};
use crate::models::dataset::{Cell, Dataset};

/// Reads and writes the report as a comma-separated file with a header row.
///
/// Every loaded value is text; empty fields load as empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReport;

impl CsvReport {
    pub fn new() -> Self {
        Self
    }
}

impl ReportStore for CsvReport {
    fn read(&self, path: &Path) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let columns = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|value| {
                        if value.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(value.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(Dataset::from_parts(columns, rows))
    }

    fn write(&self, path: &Path, dataset: &Dataset) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(dataset.columns())?;
        for row in dataset.rows() {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.csv");

        let dataset = Dataset::from_parts(
            vec!["UUID".to_string(), "Nombre Emisor".to_string(), "Total".to_string()],
            vec![
                vec![
                    Cell::Text("U-1".to_string()),
                    Cell::Text("ACME, S.A. de C.V.".to_string()),
                    Cell::Number(Decimal::new(116000, 2)),
                ],
                vec![Cell::Text("ERROR".to_string()), Cell::Empty, Cell::Empty],
            ],
        );

        CsvReport::new().write(&path, &dataset).unwrap();
        let loaded = CsvReport::new().read(&path).unwrap();

        assert_eq!(loaded.columns(), dataset.columns());
        assert_eq!(
            loaded.rows()[0],
            vec![
                Cell::Text("U-1".to_string()),
                Cell::Text("ACME, S.A. de C.V.".to_string()),
                Cell::Text("1160.00".to_string()),
            ]
        );
        assert_eq!(loaded.rows()[1][1], Cell::Empty);
    }

    #[test]
    fn test_read_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.csv");
        std::fs::write(&path, "\u{feff}UUID,Notas\nU-1,pagada\nU-2\n").unwrap();

        let loaded = CsvReport::new().read(&path).unwrap();

        assert_eq!(loaded.columns(), ["UUID".to_string(), "Notas".to_string()]);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rows()[1], vec![Cell::Text("U-2".to_string()), Cell::Empty]);
    }
}
