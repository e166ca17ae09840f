//! Data models for invoice records, report tables, and configuration.

pub mod config;
pub mod dataset;
pub mod record;

pub use config::CfdiConfig;
pub use dataset::{Cell, Dataset};
pub use record::{Identifier, InvoiceRecord};
