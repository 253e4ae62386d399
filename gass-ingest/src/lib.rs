//! gass-ingest: account dataset discovery and ledger loading (CSV and xlsx).

pub mod dataset;
pub mod error;
pub mod loader;

pub use dataset::{Dataset, list_datasets, select_dataset};
pub use error::{IngestError, Result};
pub use loader::{load_ledger, load_ledger_raw, read_ledger, read_workbook};
