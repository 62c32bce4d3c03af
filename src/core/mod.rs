//! Core migration pipeline.
//!
//! # Modules
//!
//! - [`fetch`] - Offset-based pagination over the listing endpoints
//! - [`correspondence`] - Source to target case resolution through a custom field
//! - [`transform`] - Status normalization, attachment links, case id remapping
//! - [`submit`] - Chunked bulk submission
//! - [`persist`] - Mapping table persistence
//! - [`migrate`] - Orchestration and run summary
//!
//! # Migration Workflow
//!
//! 1. **List cases** of the source and the target project
//! 2. **Resolve** which target case carries each source case id
//! 3. **List results** of the source run
//! 4. **Transform** them, dropping results without a target case
//! 5. **Persist and submit** concurrently, then wait for both
//! 6. **Report** a summary
//!
//! # Example
//!
//! ```rust,no_run
//! use qase_migrate::config::load_config;
//! use qase_migrate::core::migrate::MigrationCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None, None)?;
//! let coordinator = MigrationCoordinator::new(&config)?;
//!
//! let summary = coordinator.execute().await?;
//! println!("Mapped cases: {}", summary.mapped_cases);
//! println!("Records sent: {}", summary.records_sent);
//! # Ok(())
//! # }
//! ```

pub mod correspondence;
pub mod fetch;
pub mod migrate;
pub mod persist;
pub mod submit;
pub mod transform;
