use super::*;
use sluice_indexer::StatsSnapshot;

fn report(flushed: u64, failed: u64, elapsed: Duration) -> RunReport {
    RunReport {
        stats: StatsSnapshot {
            flushed,
            failed,
            requests: 1,
        },
        elapsed,
    }
}

#[test]
fn group_thousands_cases() {
    let cases: &[(u64, &str)] = &[
        (0, "0"),
        (7, "7"),
        (999, "999"),
        (1000, "1,000"),
        (12345, "12,345"),
        (1_234_567, "1,234,567"),
        (u64::MAX, "18,446,744,073,709,551,615"),
    ];

    for (n, expected) in cases {
        assert_eq!(group_thousands(*n), *expected, "group_thousands({})", n);
    }
}

#[test]
fn format_elapsed_cases() {
    let cases: &[(Duration, &str)] = &[
        (Duration::ZERO, "0ms"),
        (Duration::from_micros(850_400), "850ms"),
        (Duration::from_secs(1), "1s"),
        (Duration::from_millis(1500), "1.5s"),
        (Duration::from_millis(2_034), "2.034s"),
        (Duration::from_millis(123_004), "2m3.004s"),
        (Duration::from_secs(3600), "60m0s"),
    ];

    for (d, expected) in cases {
        assert_eq!(format_elapsed(*d), *expected, "format_elapsed({:?})", d);
    }
}

#[test]
fn summary_for_successful_run() {
    let mut w = BufferedWriter::default();
    print_summary(&mut w, &report(2_000, 0, Duration::from_secs(2))).expect("print");

    assert_eq!(w.lines().len(), 2);
    assert_eq!(w.lines()[0].chars().count(), RULE_WIDTH);
    assert_eq!(
        w.lines()[1],
        "Successfully indexed [2,000] documents in 2s (1,000 docs/sec)"
    );
}

#[test]
fn summary_for_failed_run() {
    let mut w = BufferedWriter::default();
    print_summary(&mut w, &report(9, 1, Duration::from_millis(500))).expect("print");

    assert_eq!(
        w.lines()[1],
        "Indexed [9] documents with [1] errors in 500ms (18 docs/sec)"
    );
}

#[test]
fn summary_for_empty_run() {
    let mut w = BufferedWriter::default();
    print_summary(&mut w, &report(0, 0, Duration::ZERO)).expect("print");

    assert_eq!(
        w.lines()[1],
        "Successfully indexed [0] documents in 0ms (0 docs/sec)"
    );
}
