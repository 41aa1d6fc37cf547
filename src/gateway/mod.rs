//! # Resource Gateway
//!
//! The reader's only way to reach the outside world. The core never calls
//! it directly: `update()` returns effects, and [`dispatch`] runs them
//! against a gateway and turns the outcome back into actions.

pub mod dispatch;
pub mod http;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::types::PageNumber;

pub use http::HttpGateway;

/// Errors that can occur while talking to the library API.
#[derive(Debug)]
pub enum GatewayError {
    /// Gateway misconfigured (bad base URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to decode the response body.
    Parse(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Config(msg) => write!(f, "config error: {msg}"),
            GatewayError::Network(msg) => write!(f, "network error: {msg}"),
            GatewayError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            GatewayError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Returns the name of the gateway.
    fn name(&self) -> &str;

    /// Raw book listing: a sequence or an enveloped sequence.
    async fn list_books(&self) -> Result<Value, GatewayError>;

    /// Raw page listing for one book: a sequence or an enveloped sequence.
    async fn list_pages(&self, book_id: &str) -> Result<Value, GatewayError>;

    async fn get_page_content(
        &self,
        book_id: &str,
        page_number: &PageNumber,
    ) -> Result<Value, GatewayError>;

    /// Loads a static asset by path and returns its size in bytes.
    async fn load_asset(&self, path: &str) -> Result<usize, GatewayError>;
}
