//! Logging utilities.
//!
//! Installs an `env_logger` backend behind the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
