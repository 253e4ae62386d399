//! Load an account ledger (CSV or xlsx workbook) into typed records.
//!
//! Expected header (extra columns are ignored, order does not matter):
//! date,description,platform,amount
//!
//! Workbooks are read from their first sheet, header on the first row.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use gass_core::record::{Record, drop_ignored};
use gass_core::time::parse_record_date;
use rust_decimal::Decimal;

use crate::error::{IngestError, Result};

const REQUIRED_COLUMNS: [&str; 4] = ["date", "description", "platform", "amount"];

/// Positions of the required columns in a header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    platform: usize,
    amount: usize,
}

impl Columns {
    fn locate<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut found = [0usize; 4];
        for (slot, col) in found.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.as_ref().trim() == col)
                .ok_or(IngestError::MissingColumn(col))?;
        }
        let [date, description, platform, amount] = found;
        Ok(Self {
            date,
            description,
            platform,
            amount,
        })
    }

    fn record<S: AsRef<str>>(&self, line: u64, cells: &[S]) -> Result<Record> {
        let cell = |i: usize| cells.get(i).map(|c| c.as_ref().trim()).unwrap_or("");

        let date = parse_record_date(cell(self.date)).ok_or_else(|| IngestError::InvalidDate {
            line,
            value: cell(self.date).to_string(),
        })?;
        let amount = parse_amount(cell(self.amount)).ok_or_else(|| IngestError::InvalidAmount {
            line,
            value: cell(self.amount).to_string(),
        })?;

        Ok(Record::new(date, cell(self.description), cell(self.platform), amount))
    }
}

fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse every row of a CSV ledger, without dropping denylisted descriptions.
pub fn read_ledger<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let cells: Vec<&str> = raw.iter().collect();
        records.push(columns.record(line, &cells)?);
    }

    Ok(records)
}

/// Parse the first sheet of a workbook, without dropping denylisted descriptions.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))??;

    let first_row = range.start().map(|(row, _)| u64::from(row)).unwrap_or(0);
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))?
        .iter()
        .map(cell_text)
        .collect();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        // 1-based sheet row; the header sits on `first_row`
        let line = first_row + i as u64 + 2;
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        records.push(columns.record(line, &cells)?);
    }

    Ok(records)
}

/// Cell contents as the text the CSV path would have seen.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
}

/// Load a ledger file without cleaning. `.xlsx` goes through the workbook
/// reader, anything else is read as CSV.
pub fn load_ledger_raw(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if is_workbook(path) {
        return read_workbook(path);
    }
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_ledger(file)
}

/// Load a ledger file and drop denylisted descriptions.
pub fn load_ledger(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let raw = load_ledger_raw(path)?;
    let total = raw.len();
    let cleaned = drop_ignored(raw);

    tracing::info!(
        file = %path.display(),
        rows = total,
        ignored = total - cleaned.len(),
        "ledger loaded"
    );
    Ok(cleaned)
}
