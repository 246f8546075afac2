mod config;
pub mod logging;

pub use config::{
    DEFAULT_ADDRESS, DEFAULT_FLUSH_BYTES, DEFAULT_FLUSH_INTERVAL, PROGRAM_LOG_LEVEL,
    PROGRAM_NAME, PROGRAM_PASSWORD, PROGRAM_USERNAME, RETRY_BASE_DELAY, default_workers,
    parse_duration,
};

pub use logging::init;
