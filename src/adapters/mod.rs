//! External system integrations.
//!
//! - [`qase`] - Qase REST API v1
//!
//! # Design Pattern
//!
//! The pipeline depends on the [`qase::QaseApi`] trait, not on the HTTP
//! client, so tests can swap in an in-memory implementation.
//!
//! ```rust,no_run
//! use qase_migrate::adapters::qase::{QaseApi, QaseClient};
//! use qase_migrate::config::{secret_string, QaseConfig};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QaseConfig {
//!     api_token: Some(secret_string("token".to_string())),
//!     ..QaseConfig::default()
//! };
//!
//! let api: Arc<dyn QaseApi> = Arc::new(QaseClient::new(&config)?);
//! println!("Talking to {}", api.base_url());
//! # Ok(())
//! # }
//! ```

pub mod qase;
