//! # API Client Core
//!
//! This module contains the main ApiClient structure and HTTP client
//! functionality shared across all API operations.

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use uuid::Uuid;

/// Error types for API operations.
///
/// This enum distinguishes between the error conditions an evaluation call
/// can hit, allowing callers to handle them appropriately.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication error (401 Unauthorized)
    #[error("Authentication failed: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Authorization error (403 Forbidden)
    #[error("Access denied: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Network error (connection failed, DNS error, timeout, etc.)
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// Server error (5xx status codes)
    #[error("Server error: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
    },

    /// Client error (4xx status codes other than 401/403)
    #[error("Request error: {message}")]
    ClientError {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
    },

    /// Response parsing error
    #[error("Failed to parse response: {message}")]
    ParseError {
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Check if this is a network error.
    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }
}

/// Convert a reqwest error to an ApiError.
pub(crate) fn to_network_error(err: reqwest::Error) -> ApiError {
    ApiError::Network {
        message: err.to_string(),
    }
}

/// Convert an HTTP response with error status to an ApiError.
pub(crate) fn to_http_error(status: reqwest::StatusCode, error_text: String) -> ApiError {
    let status_code = status.as_u16();

    match status_code {
        401 => ApiError::Unauthorized {
            message: if error_text.is_empty() {
                "Invalid or expired API key".to_string()
            } else {
                error_text
            },
        },
        403 => ApiError::Forbidden {
            message: if error_text.is_empty() {
                "Access denied".to_string()
            } else {
                error_text
            },
        },
        500..=599 => ApiError::Server {
            status: status_code,
            message: if error_text.is_empty() {
                format!("Server error ({})", status_code)
            } else {
                error_text
            },
        },
        _ => ApiError::ClientError {
            status: status_code,
            message: if error_text.is_empty() {
                format!("Request failed ({})", status_code)
            } else {
                error_text
            },
        },
    }
}

/// HTTP client for the Redline evaluation service.
///
/// # Example
///
/// ```rust,no_run
/// use redline::api::ApiClient;
///
/// let client = ApiClient::new("https://app.redline.sh".to_string());
/// ```
pub struct ApiClient {
    /// Base URL for the API (e.g., <https://app.redline.sh>)
    pub base_url: String,
    /// Underlying HTTP client
    pub client: Client,
    /// Trace ID for correlating a CLI run with server-side traces
    pub trace_id: String,
}

/// Version of the CLI, used in User-Agent header
const VERSION: &str = env!("CARGO_PKG_VERSION");

impl ApiClient {
    /// Create a new API client with proper headers for WAF compatibility.
    ///
    /// The client is configured with:
    /// - User-Agent: `redline/<version>` to identify the CLI
    /// - Accept: `application/json` for API responses
    /// - Content-Type: `application/json` for request bodies
    pub fn new(base_url: String) -> Self {
        // Generate a unique trace ID for this CLI session (128-bit hex)
        let trace_id = generate_trace_id();

        let mut headers = HeaderMap::new();

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("redline/{VERSION}"))
                .unwrap_or_else(|_| HeaderValue::from_static("redline/0.0.0")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Format: TRACE_ID/SPAN_ID;o=TRACE_TRUE, span 1 = root span, o=1 sampled
        let trace_header = format!("{}/1;o=1", trace_id);
        if let Ok(header_value) = HeaderValue::from_str(&trace_header) {
            headers.insert("X-Cloud-Trace-Context", header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url,
            client,
            trace_id,
        }
    }

    /// Get the trace ID for this client session.
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }
}

/// Generate a 128-bit trace ID as a 32-character hex string.
fn generate_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}
