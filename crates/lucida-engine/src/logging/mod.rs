//! Logging utilities.
//!
//! Centralizes logger initialization on top of the `log` facade. Library code
//! only ever calls the `log` macros; binaries call [`init_logging`] once.

mod init;

pub use init::{init_logging, LoggingConfig};
