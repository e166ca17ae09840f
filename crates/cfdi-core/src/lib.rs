//! Core library for incremental CFDI invoice reports.
//!
//! This crate provides:
//! - A namespace-aware XML element tree
//! - CFDI field extraction tolerant of namespace variations
//! - Incremental reconciliation keyed by the fiscal stamp UUID
//! - Report persistence as `.xlsx` or `.csv`
//! - A batch runner tying the pieces together

pub mod batch;
pub mod error;
pub mod invoice;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod xml;

pub use batch::{run, run_with, BatchEvent, RunSummary};
pub use error::{CfdiError, ExtractionError, ReportError, Result};
pub use invoice::{CfdiParser, InvoiceParser};
pub use models::{Cell, CfdiConfig, Dataset, Identifier, InvoiceRecord};
pub use reconcile::{reconcile, Classification, ReconcileOutcome, Reconciler};
pub use report::{load_report, save_report, ReportFormat, ReportStore};
pub use xml::XmlNode;
