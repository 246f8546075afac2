use super::*;

#[test]
fn new_uses_runtime_defaults() {
    let cfg = IndexerConfig::new("people");

    assert_eq!(cfg.index, "people");
    assert_eq!(cfg.flush_bytes, 5_000_000);
    assert_eq!(cfg.flush_interval, Duration::from_secs(30));
    assert_eq!(cfg.retries, 0);
    assert!(cfg.workers >= 1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn validate_rejects_bad_settings() {
    let base = IndexerConfig::new("people");

    let cases: Vec<(IndexerConfig, &str)> = vec![
        (
            IndexerConfig {
                index: String::new(),
                ..base.clone()
            },
            "index is required",
        ),
        (
            IndexerConfig {
                index: "  ".into(),
                ..base.clone()
            },
            "index is required",
        ),
        (
            IndexerConfig {
                workers: 0,
                ..base.clone()
            },
            "workers",
        ),
        (
            IndexerConfig {
                flush_bytes: 0,
                ..base.clone()
            },
            "flush-bytes",
        ),
        (
            IndexerConfig {
                flush_interval: Duration::ZERO,
                ..base.clone()
            },
            "flush-interval",
        ),
    ];

    for (cfg, needle) in cases {
        let err = cfg.validate().expect_err("config should be rejected");
        assert!(
            err.to_string().contains(needle),
            "error {:?} should mention {:?}",
            err.to_string(),
            needle
        );
    }
}

#[test]
fn client_defaults_to_local_endpoint_without_timeout() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.address, "http://localhost:9200");
    assert!(cfg.username.is_none());
    assert!(cfg.timeout.is_none());
}
