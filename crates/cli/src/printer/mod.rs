use std::{io, time::Duration};

use sluice_indexer::RunReport;

const RULE_WIDTH: usize = 65;

/// Trait for writing status messages (run summary, fatal errors).
pub trait StatusWriter {
    fn write_status(&mut self, msg: &str) -> io::Result<()>;
}

/// Default status writer that outputs to stderr.
pub struct StderrWriter;

impl StatusWriter for StderrWriter {
    fn write_status(&mut self, msg: &str) -> io::Result<()> {
        eprintln!("{}", msg);
        Ok(())
    }
}

/// Buffering status writer for testing.
#[cfg(test)]
#[derive(Default)]
pub struct BufferedWriter {
    buf: Vec<String>,
}

#[cfg(test)]
impl BufferedWriter {
    pub fn lines(&self) -> &[String] {
        &self.buf
    }
}

#[cfg(test)]
impl StatusWriter for BufferedWriter {
    fn write_status(&mut self, msg: &str) -> io::Result<()> {
        self.buf.push(msg.to_owned());
        Ok(())
    }
}

/// Write the end-of-run summary: a rule, then one line with counts,
/// elapsed time and throughput.
pub fn print_summary<W: StatusWriter>(w: &mut W, report: &RunReport) -> io::Result<()> {
    let flushed = group_thousands(report.stats.flushed);
    let elapsed = format_elapsed(report.elapsed);
    let rate = group_thousands(report.docs_per_sec() as u64);

    w.write_status(&"▔".repeat(RULE_WIDTH))?;

    if report.is_success() {
        w.write_status(&format!(
            "Successfully indexed [{flushed}] documents in {elapsed} ({rate} docs/sec)"
        ))
    } else {
        w.write_status(&format!(
            "Indexed [{flushed}] documents with [{}] errors in {elapsed} ({rate} docs/sec)",
            group_thousands(report.stats.failed)
        ))
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Millisecond precision: `850ms`, `1.5s`, `2m3.004s`.
pub fn format_elapsed(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        return format!("{ms}ms");
    }

    let minutes = ms / 60_000;
    let secs = (ms % 60_000) / 1000;
    let frac = ms % 1000;

    let mut out = String::new();
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&secs.to_string());
    if frac > 0 {
        let frac = format!("{frac:03}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out.push('s');
    out
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
