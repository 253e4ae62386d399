use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("data directory not found: {0}")]
    MissingDataDir(PathBuf),

    #[error("no datasets found in {0}")]
    NoDatasets(PathBuf),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("workbook has no readable sheet: {0}")]
    EmptyWorkbook(PathBuf),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: invalid date `{value}`")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: invalid amount `{value}`")]
    InvalidAmount { line: u64, value: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
