//! Per-account dataset files in the data directory.
//!
//! Each account lives in its own `<name>.csv` or `<name>.xlsx`; the
//! account id is the upper-cased file stem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

const DATASET_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub path: PathBuf,
    pub file_name: String,
    pub account_id: String,
}

impl Dataset {
    fn from_path(path: PathBuf) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let stem = path.file_stem()?.to_str()?;
        Some(Self {
            account_id: stem.to_uppercase(),
            file_name,
            path,
        })
    }
}

/// List account datasets sorted by file name.
pub fn list_datasets(data_dir: &Path) -> Result<Vec<Dataset>> {
    if !data_dir.is_dir() {
        return Err(IngestError::MissingDataDir(data_dir.to_path_buf()));
    }

    let entries = fs::read_dir(data_dir).map_err(|source| IngestError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let mut datasets = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_dataset = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| DATASET_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)));
        if !path.is_file() || !is_dataset {
            continue;
        }
        if let Some(ds) = Dataset::from_path(path) {
            datasets.push(ds);
        }
    }

    if datasets.is_empty() {
        return Err(IngestError::NoDatasets(data_dir.to_path_buf()));
    }

    datasets.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!(count = datasets.len(), dir = %data_dir.display(), "datasets found");
    Ok(datasets)
}

/// Pick a dataset by 1-based position or by (case-insensitive) account name.
pub fn select_dataset<'a>(datasets: &'a [Dataset], choice: &str) -> Result<&'a Dataset> {
    let choice = choice.trim();

    if let Ok(n) = choice.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| datasets.get(i))
            .ok_or_else(|| {
                IngestError::InvalidSelection(format!("{n} is not between 1 and {}", datasets.len()))
            });
    }

    datasets
        .iter()
        .find(|d| d.account_id.eq_ignore_ascii_case(choice) || d.file_name.eq_ignore_ascii_case(choice))
        .ok_or_else(|| IngestError::InvalidSelection(format!("no dataset named '{choice}'")))
}
