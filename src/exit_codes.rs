//! # Exit Codes
//!
//! Standard exit codes for the Redline CLI.
//!
//! These codes follow common Unix conventions and provide meaningful
//! feedback to scripts and CI/CD pipelines.

/// Successful execution, no error-level violations
pub const EXIT_SUCCESS: i32 = 0;

/// Review completed and found error-level violations
pub const EXIT_VIOLATIONS_FOUND: i32 = 1;

/// Configuration error (missing or invalid config)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Network error (connection failed, timeout, undeliverable review)
pub const EXIT_NETWORK_ERROR: i32 = 4;
