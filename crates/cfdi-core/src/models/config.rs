//! Configuration for a report update run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the cfdi pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfdiConfig {
    /// Directory scanned for invoice documents.
    pub input_dir: PathBuf,

    /// Report file read at start and rewritten when new rows are added.
    /// The extension picks the format (`.xlsx` or `.csv`).
    pub report_path: PathBuf,

    /// File extensions treated as invoice documents (case-insensitive, no dot).
    pub extensions: Vec<String>,
}

impl Default for CfdiConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Facturas"),
            report_path: PathBuf::from("Reporte_Facturas_CFDI.xlsx"),
            extensions: vec!["xml".to_string()],
        }
    }
}

impl CfdiConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check whether a path has one of the configured document extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CfdiConfig = serde_json::from_str(r#"{"input_dir": "/srv/xml"}"#).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("/srv/xml"));
        assert_eq!(config.report_path, PathBuf::from("Reporte_Facturas_CFDI.xlsx"));
        assert_eq!(config.extensions, vec!["xml".to_string()]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = CfdiConfig {
            report_path: PathBuf::from("out.csv"),
            ..CfdiConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(CfdiConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_is_document() {
        let config = CfdiConfig::default();

        assert!(config.is_document(Path::new("a/factura.xml")));
        assert!(config.is_document(Path::new("FACTURA.XML")));
        assert!(!config.is_document(Path::new("factura.pdf")));
        assert!(!config.is_document(Path::new("xml")));
    }
}
