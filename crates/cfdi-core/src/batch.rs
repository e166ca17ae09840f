//! Incremental report update over a directory of invoice documents.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::{debug, info, warn};

use crate::error::{CfdiError, Result};
use crate::invoice::{CfdiParser, InvoiceParser};
use crate::models::config::CfdiConfig;
use crate::models::dataset::Dataset;
use crate::models::record::InvoiceRecord;
use crate::reconcile::{Classification, Reconciler};
use crate::report::{load_report, save_report, ReportFormat};

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Documents were found and are about to be processed.
    Started { documents: usize },

    /// One document was extracted and reconciled.
    Document {
        path: &'a Path,
        record: &'a InvoiceRecord,
        classification: Classification,
    },
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows in the report before the run; `None` when there was no usable report.
    pub prior_rows: Option<usize>,
    /// Documents found in the input directory.
    pub documents: usize,
    /// Rows appended.
    pub added: usize,
    /// Documents skipped as already reported.
    pub skipped: usize,
    /// Appended rows that record an extraction failure.
    pub errors: usize,
    /// Whether the report file was rewritten.
    pub written: bool,
    pub report_path: PathBuf,
}

/// Run with the CFDI parser and no progress reporting.
pub fn run(config: &CfdiConfig) -> Result<RunSummary> {
    run_with(config, &CfdiParser::new(), |_| {})
}

/// Extract every document in `config.input_dir`, append the new ones to the
/// report and save it if anything was added.
pub fn run_with<P, F>(config: &CfdiConfig, parser: &P, mut on_event: F) -> Result<RunSummary>
where
    P: InvoiceParser,
    F: FnMut(&BatchEvent<'_>),
{
    if !config.input_dir.is_dir() {
        return Err(CfdiError::InputDirectoryMissing(config.input_dir.clone()));
    }
    ReportFormat::from_path(&config.report_path)?;

    let prior = load_existing(&config.report_path);
    let prior_rows = prior.as_ref().map(Dataset::len);

    let documents = scan_documents(config)?;
    let mut summary = RunSummary {
        prior_rows,
        documents: documents.len(),
        added: 0,
        skipped: 0,
        errors: 0,
        written: false,
        report_path: config.report_path.clone(),
    };

    if documents.is_empty() {
        info!("No documents found in {}", config.input_dir.display());
        return Ok(summary);
    }

    info!("Analyzing {} documents", documents.len());
    on_event(&BatchEvent::Started {
        documents: documents.len(),
    });

    let mut reconciler = Reconciler::new(prior.unwrap_or_default());
    for path in &documents {
        let record = parser.extract_file(path);
        let classification = reconciler.offer(&record);

        if record.is_error() {
            summary.errors += 1;
        } else if classification == Classification::New {
            info!("New invoice {} ({})", record.identifier, record.file_name);
        }

        on_event(&BatchEvent::Document {
            path: path.as_path(),
            record: &record,
            classification,
        });
    }

    let outcome = reconciler.finish();
    summary.added = outcome.added;
    summary.skipped = outcome.skipped;

    if outcome.added == 0 {
        info!("No new invoices; report left unchanged");
        return Ok(summary);
    }

    if let Some(parent) = config.report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    save_report(&config.report_path, &outcome.dataset)?;
    summary.written = true;
    info!(
        "Report saved to {} ({} rows)",
        config.report_path.display(),
        outcome.dataset.len()
    );

    Ok(summary)
}

/// Load the prior report.
///
/// A missing report and an unreadable one both yield `None`; the latter is
/// logged and the run continues as if the report did not exist.
pub fn load_existing(path: &Path) -> Option<Dataset> {
    match load_report(path) {
        Ok(Some(dataset)) => {
            info!("Read existing report {} ({} rows)", path.display(), dataset.len());
            Some(dataset)
        }
        Ok(None) => {
            info!("Report {} does not exist; it will be created", path.display());
            None
        }
        Err(source) => {
            let error = CfdiError::PriorDatasetUnreadable {
                path: path.to_path_buf(),
                source,
            };
            warn!("{}; a new report will be written", error);
            None
        }
    }
}

/// List the documents of the input directory, sorted by path.
pub fn scan_documents(config: &CfdiConfig) -> Result<Vec<PathBuf>> {
    let dir = Pattern::escape(&config.input_dir.to_string_lossy());
    let pattern = Path::new(&dir).join("*");

    let mut documents: Vec<PathBuf> = glob(&pattern.to_string_lossy())
        .map_err(|e| CfdiError::Config(format!("invalid input directory pattern: {}", e)))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && config.is_document(path))
        .collect();

    documents.sort();
    debug!("Found {} documents in {}", documents.len(), config.input_dir.display());
    Ok(documents)
}
