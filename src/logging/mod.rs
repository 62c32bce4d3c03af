//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - human-readable console output
//! - configurable log levels, overridable with `RUST_LOG`
//! - optional JSON log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use qase_migrate::config::LoggingConfig;
//! use qase_migrate::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(project = "CORE", "Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
