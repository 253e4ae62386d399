//! Blocking console prompts. Each prompt reads from any `BufRead` so the
//! settle flow can be driven from tests.

use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};

pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{}: ", label)?;
    out.flush()?;
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        bail!("input closed while waiting for: {label}");
    }
    Ok(s.trim().to_string())
}

/// Ask until `parse` accepts the answer.
pub fn prompt_until<R, W, T, F>(input: &mut R, out: &mut W, label: &str, mut parse: F) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<T>,
{
    loop {
        let answer = prompt_line(input, out, label)?;
        match parse(&answer) {
            Ok(v) => return Ok(v),
            Err(e) => writeln!(out, "Invalid input: {e:#}")?,
        }
    }
}

pub fn stdin_line(label: &str) -> Result<String> {
    prompt_line(&mut io::stdin().lock(), &mut io::stdout(), label)
}

pub fn stdin_until<T>(label: &str, parse: impl FnMut(&str) -> Result<T>) -> Result<T> {
    prompt_until(&mut io::stdin().lock(), &mut io::stdout(), label, parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_prompt_line_trims() {
        let mut input = "  42 \n".as_bytes();
        let mut out = Vec::new();
        let answer = prompt_line(&mut input, &mut out, "Number").unwrap();
        assert_eq!(answer, "42");
        assert_eq!(String::from_utf8(out).unwrap(), "Number: ");
    }

    #[test]
    fn test_prompt_until_retries() {
        let mut input = "abc\n-3\n7\n".as_bytes();
        let mut out = Vec::new();
        let v: u32 = prompt_until(&mut input, &mut out, "Count", |s| {
            s.parse::<u32>().map_err(|e| anyhow!("{e}"))
        })
        .unwrap();
        assert_eq!(v, 7);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Invalid input").count(), 2);
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let mut input = "".as_bytes();
        let mut out = Vec::new();
        assert!(prompt_line(&mut input, &mut out, "Anything").is_err());
    }
}
