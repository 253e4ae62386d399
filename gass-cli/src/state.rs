use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn gass_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".gass"))
}

pub fn ensure_gass_home() -> Result<PathBuf> {
    let dir = gass_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Create the reports directory if needed and return the full report path.
pub fn report_path(reports_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(reports_dir).with_context(|| format!("create {}", reports_dir.display()))?;
    Ok(reports_dir.join(file_name))
}
