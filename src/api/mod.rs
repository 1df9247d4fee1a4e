//! Types and utilities for talking to the evaluation service.
//!
//! - `client` - HTTP client core and error taxonomy
//! - `review` - Evaluation endpoint types and the `Evaluate` seam

pub mod client;
pub mod review;

pub use client::{ApiClient, ApiError};
pub use review::{ApiEvaluator, Evaluate, ReviewRequest, ReviewResponse};
