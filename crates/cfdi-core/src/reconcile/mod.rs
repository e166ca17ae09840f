//! Incremental reconciliation of extracted records against an existing report.
//!
//! A record is appended unless its stamp UUID is already known, either from the
//! report loaded at start or from an earlier record of the same run. Rows
//! without a usable UUID (error rows and unstamped invoices) are always
//! appended and never become known identifiers.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::models::dataset::{Cell, Dataset};
use crate::models::record::{Identifier, InvoiceRecord, IDENTIFIER_COLUMN};

/// How a candidate record was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// UUID already present; the record was discarded.
    Duplicate,
    /// No usable UUID; the record was appended without being remembered.
    Unverifiable,
    /// First occurrence of a UUID; the record was appended.
    New,
}

impl Classification {
    /// Whether the record ended up in the dataset.
    pub fn is_added(self) -> bool {
        !matches!(self, Classification::Duplicate)
    }
}

/// Stamp UUIDs already present in the report.
#[derive(Debug, Clone, Default)]
pub struct IdentifierSet {
    known: HashSet<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the UUIDs of a loaded report.
    ///
    /// Sentinel and empty cells are skipped. A non-empty report without a
    /// `UUID` column yields an empty set.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let Some(column) = dataset.column(IDENTIFIER_COLUMN) else {
            if !dataset.is_empty() {
                warn!(
                    "Existing report has no '{}' column; every document will be treated as new",
                    IDENTIFIER_COLUMN
                );
            }
            return Self::new();
        };

        let known = column
            .filter_map(|cell| match cell {
                Cell::Empty => None,
                Cell::Text(s) => Identifier::from_cell(s).stamp().map(str::to_string),
                Cell::Number(n) => Some(n.to_string()),
            })
            .collect();

        Self { known }
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.known.contains(uuid)
    }

    /// Remember a UUID. Returns `false` if it was already known.
    pub fn insert(&mut self, uuid: &str) -> bool {
        self.known.insert(uuid.to_string())
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// Result of reconciling one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// Existing rows followed by the appended records.
    pub dataset: Dataset,
    /// Records appended.
    pub added: usize,
    /// Records discarded as duplicates.
    pub skipped: usize,
}

/// Accumulates candidate records on top of an existing dataset.
#[derive(Debug, Clone)]
pub struct Reconciler {
    dataset: Dataset,
    identifiers: IdentifierSet,
    added: usize,
    skipped: usize,
}

impl Reconciler {
    /// Start from an existing dataset (empty when there is no prior report).
    pub fn new(existing: Dataset) -> Self {
        let identifiers = IdentifierSet::from_dataset(&existing);
        info!("Found {} invoices already in the report", identifiers.len());

        Self {
            dataset: existing,
            identifiers,
            added: 0,
            skipped: 0,
        }
    }

    /// Classify one candidate and append it unless it is a duplicate.
    pub fn offer(&mut self, record: &InvoiceRecord) -> Classification {
        let classification = match record.identifier.stamp() {
            Some(uuid) if self.identifiers.insert(uuid) => Classification::New,
            Some(_) => Classification::Duplicate,
            None => Classification::Unverifiable,
        };

        if classification.is_added() {
            self.dataset.push_record(record);
            self.added += 1;
        } else {
            self.skipped += 1;
        }

        debug!("{} ({}): {:?}", record.file_name, record.identifier, classification);
        classification
    }

    pub fn finish(self) -> ReconcileOutcome {
        ReconcileOutcome {
            dataset: self.dataset,
            added: self.added,
            skipped: self.skipped,
        }
    }
}

/// Merge `candidates` into `existing`, in order, skipping known UUIDs.
pub fn reconcile<'a>(
    existing: Dataset,
    candidates: impl IntoIterator<Item = &'a InvoiceRecord>,
) -> ReconcileOutcome {
    let mut reconciler = Reconciler::new(existing);
    for record in candidates {
        reconciler.offer(record);
    }
    reconciler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::record::COLUMNS;
    use pretty_assertions::assert_eq;

    fn stamped(uuid: &str, file: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::from_error(file, &ExtractionError::MissingRootNode);
        record.identifier = Identifier::Stamped(uuid.to_string());
        record.issue_date = Some("2025-01-01".to_string());
        record
    }

    fn unstamped(file: &str) -> InvoiceRecord {
        let mut record = stamped("x", file);
        record.identifier = Identifier::Unstamped;
        record
    }

    fn error(file: &str) -> InvoiceRecord {
        InvoiceRecord::from_error(file, &ExtractionError::Xml("no element found".to_string()))
    }

    fn existing(uuids: &[&str]) -> Dataset {
        Dataset::from_parts(
            vec!["UUID".to_string(), "Archivo XML".to_string()],
            uuids
                .iter()
                .enumerate()
                .map(|(i, u)| vec![Cell::Text(u.to_string()), Cell::Text(format!("old{i}.xml"))])
                .collect(),
        )
    }

    fn uuids(dataset: &Dataset) -> Vec<String> {
        dataset.column("UUID").unwrap().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_scenario_duplicate_new_and_error() {
        let candidates = [stamped("UUID-1", "a.xml"), stamped("UUID-2", "b.xml"), error("c.xml")];

        let outcome = reconcile(existing(&["UUID-1"]), &candidates);

        assert_eq!(outcome.dataset.len(), 3);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.added, 2);
        assert_eq!(uuids(&outcome.dataset), vec!["UUID-1", "UUID-2", "ERROR"]);
    }

    #[test]
    fn test_intra_run_duplicates() {
        let candidates = [
            stamped("A", "1.xml"),
            stamped("B", "2.xml"),
            stamped("A", "3.xml"),
        ];

        let outcome = reconcile(Dataset::new(), &candidates);

        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.skipped, 1);
        let files: Vec<_> = outcome.dataset.column("Archivo XML").unwrap().map(|c| c.to_string()).collect();
        assert_eq!(files, vec!["1.xml", "2.xml"]);
    }

    #[test]
    fn test_unverifiable_records_never_collide() {
        let candidates = [error("a.xml"), error("a.xml"), unstamped("b.xml"), unstamped("c.xml")];

        let mut reconciler = Reconciler::new(Dataset::new());
        let classes: Vec<_> = candidates.iter().map(|r| reconciler.offer(r)).collect();

        assert!(classes.iter().all(|c| *c == Classification::Unverifiable));
        let outcome = reconciler.finish();
        assert_eq!(outcome.added, 4);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_prior_error_rows_are_not_identifiers() {
        let outcome = reconcile(existing(&["ERROR", "N/A", ""]), &[error("x.xml"), unstamped("y.xml")]);

        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.dataset.len(), 5);
    }

    #[test]
    fn test_idempotent_rerun() {
        let candidates = [stamped("A", "1.xml"), stamped("B", "2.xml")];

        let first = reconcile(existing(&["Z"]), &candidates);
        let second = reconcile(first.dataset.clone(), &candidates);

        assert_eq!(second.added, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(second.dataset, first.dataset);
    }

    #[test]
    fn test_order_and_uniqueness() {
        let candidates = [
            stamped("C", "c.xml"),
            error("e.xml"),
            stamped("A", "a.xml"),
            stamped("B", "b.xml"),
            stamped("C", "c2.xml"),
        ];

        let outcome = reconcile(existing(&["B", "Y"]), &candidates);

        assert_eq!(uuids(&outcome.dataset), vec!["B", "Y", "C", "ERROR", "A"]);

        let valid: Vec<_> = uuids(&outcome.dataset)
            .into_iter()
            .filter(|u| u != "ERROR" && u != "N/A")
            .collect();
        let distinct: HashSet<_> = valid.iter().collect();
        assert_eq!(distinct.len(), valid.len());

        // Every candidate is either in the output or counted as skipped.
        assert_eq!(outcome.added + outcome.skipped, candidates.len());
    }

    #[test]
    fn test_no_candidates_leaves_dataset_unchanged() {
        let before = existing(&["A", "B"]);
        let none: Vec<InvoiceRecord> = Vec::new();
        let outcome = reconcile(before.clone(), &none);

        assert_eq!(outcome.dataset, before);
        assert_eq!(outcome.added, 0);
    }

    #[test]
    fn test_missing_identifier_column_means_no_known_ids() {
        let prior = Dataset::from_parts(
            vec!["Notas".to_string()],
            vec![vec![Cell::Text("pagada".to_string())]],
        );

        assert!(IdentifierSet::from_dataset(&prior).is_empty());

        let outcome = reconcile(prior, &[stamped("A", "a.xml")]);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.dataset.columns().len(), COLUMNS.len() + 1);
    }

    #[test]
    fn test_insert_reports_first_occurrence() {
        let mut set = IdentifierSet::from_dataset(&existing(&["A"]));

        assert!(!set.insert("A"));
        assert!(set.insert("B"));
        assert!(!set.insert("B"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_numeric_identifier_cells() {
        let prior = Dataset::from_parts(
            vec!["UUID".to_string()],
            vec![vec![Cell::Number(rust_decimal::Decimal::from(12345))]],
        );

        let set = IdentifierSet::from_dataset(&prior);
        assert!(set.contains("12345"));
    }
}
