//! Qase REST API adapter
//!
//! - [`QaseApi`] - the operations the migration uses (trait seam)
//! - [`QaseClient`] - the reqwest implementation
//! - [`models`] - response envelopes

pub mod api;
pub mod client;
pub mod models;

pub use api::QaseApi;
pub use client::QaseClient;
