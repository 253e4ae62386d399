use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_gass_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
    pub rate: RateSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub data_dir: PathBuf,
    pub reports_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateProvider {
    /// Scrape the central bank homepage
    Bcv,
    /// Read a number from a JSON endpoint
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSection {
    pub provider: RateProvider,
    pub url: String,
    /// For provider = "json": JSON pointer to the rate (e.g. "/price")
    pub json_pointer: String,
    pub timeout_secs: u64,
    /// The BCV site has a history of broken certificate chains
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// IANA timezone for the GENERATED timestamp
    pub timezone: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            reports_dir: PathBuf::from("history_reports"),
        }
    }
}

impl Default for RateSection {
    fn default() -> Self {
        Self {
            provider: RateProvider::Bcv,
            url: "https://www.bcv.org.ve/".to_string(),
            json_pointer: "/price".to_string(),
            timeout_secs: 15,
            accept_invalid_certs: false,
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            timezone: "America/Caracas".to_string(),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ensure_gass_home()?.join("config.toml"))
}

/// Load `path` (or the default location); a missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if !p.exists() {
        tracing::debug!(path = %p.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg = parse_config(&s).with_context(|| format!("parse {}", p.display()))?;
    tracing::info!(path = %p.display(), "config loaded");
    Ok(cfg)
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = parse_config(
            r#"
[rate]
provider = "json"
url = "https://example.test/rates"
json_pointer = "/usd/rate"
"#,
        )
        .unwrap();
        assert_eq!(cfg.rate.provider, RateProvider::Json);
        assert_eq!(cfg.rate.json_pointer, "/usd/rate");
        assert_eq!(cfg.rate.timeout_secs, 15);
        assert_eq!(cfg.paths.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.report.timezone, "America/Caracas");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(parse_config("[rate]\nprovider = \"carrier-pigeon\"\n").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.paths.reports_dir = PathBuf::from("/srv/reports");
        save_config(&cfg, &p).unwrap();

        assert_eq!(load_config(Some(&p)).unwrap(), cfg);
        assert_eq!(load_config(Some(&tmp.path().join("missing.toml"))).unwrap(), Config::default());
    }
}
