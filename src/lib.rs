//! # Redline CLI Library
//!
//! This crate provides the core functionality for the Redline CLI,
//! a tool for reviewing content against declarative rulesets.
//!
//! ## Modules
//!
//! - [`api`] - HTTP client for the remote evaluation service
//! - [`commands`] - CLI command implementations
//! - [`config`] - Ruleset configuration loading and validation
//! - [`errors`] - Error handling and display
//! - [`exit_codes`] - Standard exit codes
//! - [`review`] - Matching, planning, dispatch, aggregation, and rendering

pub mod api;
pub mod commands;
pub mod config;
pub mod errors;
pub mod exit_codes;
pub mod review;

// Re-export commonly used types
pub use config::Config;
pub use review::types::{Level, Rule, Ruleset};
