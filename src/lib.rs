// Qase Migrate - Test Run Result Migration for Qase
// Copyright (c) 2025 Qase Migrate Contributors
// Licensed under the MIT License

//! # Qase Migrate
//!
//! Copies the results of a test run in one Qase project into a run of
//! another project whose test cases are numbered independently.
//!
//! ## Overview
//!
//! Target cases record the id of the case they were copied from in a custom
//! field. The library:
//! - **Lists** the cases of both projects and the results of the source run
//! - **Resolves** source case ids to target case ids through that field
//! - **Transforms** results: remapped case ids, normalized statuses, attachment links
//! - **Submits** them to the target run in batches of at most 200
//! - **Persists** the resolved mapping as a CSV table, concurrently with submission
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages and orchestration
//! - [`adapters`] - Qase REST API integration
//! - [`domain`] - Identifiers, models and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qase_migrate::config::load_config;
//! use qase_migrate::core::migrate::MigrationCoordinator;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config(None, Some(Path::new("fallback.txt")))?;
//!     let coordinator = MigrationCoordinator::new(&config)?;
//!
//!     let summary = coordinator.execute().await?;
//!     println!("Sent {} of {} records", summary.records_sent, summary.records_prepared);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], carrying a
//! [`domain::MigrateError`]. Failures before submission starts abort the
//! run without side effects; a rejected batch is reported in the
//! [`core::migrate::MigrationSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
