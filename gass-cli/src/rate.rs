//! Official USD rate lookup with a manual fallback.
//!
//! One attempt only. Any failure is reported on the console and the operator
//! is asked to type the rate.

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Duration;

use crate::config::{RateProvider, RateSection};
use crate::prompt;

/// Parse a number written either as `36.12` or in Venezuelan style
/// (`36,12340000`, `1.234,56`).
pub fn parse_localized_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| anyhow!("not a number '{s}': {e}"))
}

pub fn parse_positive_rate(s: &str) -> Result<Decimal> {
    let rate = parse_localized_decimal(s)?;
    if rate <= Decimal::ZERO {
        bail!("rate must be positive, got {rate}");
    }
    Ok(rate)
}

/// Extract the USD figure from the BCV homepage markup:
/// `<div id="dolar"> ... <strong> 36,12340000 </strong>`
pub fn parse_bcv_html(html: &str) -> Result<Decimal> {
    let re = Regex::new(r#"(?s)id\s*=\s*"dolar".*?<strong>\s*([0-9][0-9.,]*)\s*</strong>"#)?;
    let caps = re
        .captures(html)
        .ok_or_else(|| anyhow!("USD rate not found in BCV page"))?;
    parse_positive_rate(&caps[1])
}

/// Read the rate at `pointer` from a JSON document; numbers and numeric
/// strings are both accepted.
pub fn parse_json_rate(body: &str, pointer: &str) -> Result<Decimal> {
    let value: serde_json::Value = serde_json::from_str(body).context("response is not JSON")?;
    let node = value
        .pointer(pointer)
        .ok_or_else(|| anyhow!("no value at JSON pointer {pointer}"))?;
    match node {
        serde_json::Value::Number(n) => parse_positive_rate(&n.to_string()),
        serde_json::Value::String(s) => parse_positive_rate(s),
        other => bail!("value at {pointer} is not numeric: {other}"),
    }
}

pub async fn fetch_official_rate(cfg: &RateSection) -> Result<Decimal> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .danger_accept_invalid_certs(cfg.accept_invalid_certs)
        .build()
        .context("build HTTP client")?;

    let resp = client
        .get(&cfg.url)
        .send()
        .await
        .with_context(|| format!("GET {}", cfg.url))?;

    let status = resp.status();
    if !status.is_success() {
        bail!("{} returned {}", cfg.url, status);
    }
    let body = resp.text().await.context("read rate response")?;

    let rate = match cfg.provider {
        RateProvider::Bcv => parse_bcv_html(&body)?,
        RateProvider::Json => parse_json_rate(&body, &cfg.json_pointer)?,
    };
    tracing::info!(provider = ?cfg.provider, %rate, "official rate fetched");
    Ok(rate)
}

/// Decide the official rate for this run: a fixed value from the command
/// line, otherwise one lookup (unless disabled), then the manual prompt on
/// `input`. Progress messages go to `out`.
pub async fn resolve_official_rate<R: BufRead, W: Write>(
    cfg: &RateSection,
    fixed: Option<Decimal>,
    no_fetch: bool,
    input: &mut R,
    out: &mut W,
) -> Result<Decimal> {
    if let Some(rate) = fixed {
        writeln!(out, "Using official rate from command line: {rate} VES/USD")?;
        return Ok(rate);
    }

    if !no_fetch {
        writeln!(out, "Connecting to Financial Services for BCV rate...")?;
        out.flush()?;
        match fetch_official_rate(cfg).await {
            Ok(rate) => {
                writeln!(out, "Connection successful. Official Rate: {rate} VES/USD")?;
                return Ok(rate);
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "rate lookup failed");
                writeln!(out, "Automatic fetch failed: {e:#}")?;
            }
        }
    }

    prompt::prompt_until(
        input,
        out,
        "Please enter the official BCV rate manually",
        parse_positive_rate,
    )
}
