//! Core contracts for challan record synthesis.
//!
//! This crate defines the violation catalogue, the record value object and
//! the column orders shared by the generator and the CLI.

pub mod catalogue;
pub mod error;
pub mod record;

pub use catalogue::{AmountRange, Catalogue, CatalogueEntry, DEFAULT_CHALLAN_RANGE};
pub use error::{Error, Result};
pub use record::{BATCH_COLUMNS, LIVE_COLUMNS, RecordColumn, ViolationRecord};
