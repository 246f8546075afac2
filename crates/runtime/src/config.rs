use std::{thread, time::Duration};

pub const PROGRAM_NAME: &str = "sluice";
pub const PROGRAM_LOG_LEVEL: &str = "SLUICE_LOG_LEVEL";
pub const PROGRAM_USERNAME: &str = "SLUICE_USERNAME";
pub const PROGRAM_PASSWORD: &str = "SLUICE_PASSWORD";

/// Default backend endpoint.
pub const DEFAULT_ADDRESS: &str = "http://localhost:9200";

/// Pending bytes that force a batch out.
pub const DEFAULT_FLUSH_BYTES: usize = 5_000_000;

/// Maximum age of a pending batch before the ticker flushes it.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);

/// Delay before the first retry of a failed bulk request. Doubles per attempt.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Number of dispatch workers when none is configured.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Parse a Go-style duration such as `30s`, `500ms`, `1m30s` or `1h`.
///
/// Units: `ns`, `us`, `ms`, `s`, `m`, `h`. A bare `0` is accepted.
/// Fractional values (`1.5s`) are allowed per component.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration {input:?}"))?;
        if num_end == 0 {
            return Err(format!("invalid duration {input:?}"));
        }
        let value: f64 = rest[..num_end]
            .parse()
            .map_err(|_| format!("invalid number in duration {input:?}"))?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos: f64 = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            other => return Err(format!("unknown unit {other:?} in duration {input:?}")),
        };
        rest = &rest[unit_end..];

        let nanos = (value * unit_nanos).round();
        if !nanos.is_finite() || nanos > u64::MAX as f64 {
            return Err(format!("duration out of range: {input:?}"));
        }
        total = total
            .checked_add(Duration::from_nanos(nanos as u64))
            .ok_or_else(|| format!("duration out of range: {input:?}"))?;
    }

    Ok(total)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
