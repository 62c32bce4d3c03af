//! CLI command implementations
//!
//! Every command returns its process exit code:
//! 0 success, 1 a batch was rejected, 2 configuration error, 5 fatal error.

pub mod init;
pub mod migrate;
pub mod validate;
