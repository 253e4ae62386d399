//! Console + history file output for a rendered report.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::Path;

/// Writes every line to both sinks.
pub struct Tee<A: Write, B: Write> {
    console: A,
    file: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(console: A, file: B) -> Self {
        Self { console, file }
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.console, "{text}")?;
        writeln!(self.file, "{text}")
    }

    pub fn finish(mut self) -> io::Result<(A, B)> {
        self.console.flush()?;
        self.file.flush()?;
        Ok((self.console, self.file))
    }
}

/// Print `lines` and save them to `path` (truncating any earlier report).
pub fn write_report(lines: &[String], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut tee = Tee::new(io::stdout().lock(), LineWriter::new(file));

    for l in lines {
        tee.line(l).with_context(|| format!("write {}", path.display()))?;
    }
    tee.finish().with_context(|| format!("flush {}", path.display()))?;

    tracing::info!(path = %path.display(), lines = lines.len(), "report saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writes_both() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        tee.line("HEADER").unwrap();
        tee.line("").unwrap();
        tee.line("TOTAL: 1.00 $").unwrap();
        let (console, file) = tee.finish().unwrap();
        assert_eq!(console, file);
        assert_eq!(String::from_utf8(file).unwrap(), "HEADER\n\nTOTAL: 1.00 $\n");
    }

    #[test]
    fn test_write_report_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Settlement_X_2024-01-01.txt");
        std::fs::write(&path, "stale report\n").unwrap();

        let lines = vec!["A".to_string(), "B".to_string()];
        write_report(&lines, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_write_report_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nope").join("r.txt");
        assert!(write_report(&["A".to_string()], &path).is_err());
    }
}
