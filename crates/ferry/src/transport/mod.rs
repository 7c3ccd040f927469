//! Transport abstraction
//!
//! The pipeline never talks to the network itself. It hands a
//! [`TransportRequest`] to a [`Transport`] and reads back status, headers and a
//! lazily read [`ResponseBody`].

use std::fmt::Debug;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::body::RequestBody;
use crate::config::{Credentials, Passthrough, ResolvedConfig};
use crate::headers::Headers;
use crate::method::Method;

#[cfg(test)]
pub(crate) mod fake;
mod reqwest_backend;

pub use reqwest_backend::ReqwestTransport;

/// Errors a transport reports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The call was aborted through its cancellation token
    #[error("Request cancelled")]
    Cancelled,
    /// The transport's own deadline elapsed
    #[error("Request timeout")]
    TimedOut,
    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The request could not be built (bad header, body, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether the pipeline should classify this as a timeout
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TransportError::Cancelled | TransportError::TimedOut)
    }
}

/// Request handed to a transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Final URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: Headers,
    /// Encoded body
    pub body: Option<RequestBody>,
    /// Credentials policy
    pub credentials: Credentials,
    /// Transport-specific options, untouched by the pipeline
    pub passthrough: Passthrough,
    /// Token the transport must honor by failing with [`TransportError::Cancelled`]
    pub cancellation: CancellationToken,
}

impl TransportRequest {
    /// Build a transport request from a resolved config
    pub fn from_config(config: &ResolvedConfig, cancellation: CancellationToken) -> Self {
        Self {
            url: config.url.clone(),
            method: config.method,
            headers: config.headers.clone(),
            body: config.body.clone(),
            credentials: config.credentials,
            passthrough: config.passthrough.clone(),
            cancellation,
        }
    }
}

/// Lazily read response body
pub trait ResponseBody: Send {
    /// Read the whole body
    fn bytes(self: Box<Self>) -> BoxFuture<'static, Result<Vec<u8>, TransportError>>;
}

impl ResponseBody for Vec<u8> {
    fn bytes(self: Box<Self>) -> BoxFuture<'static, Result<Vec<u8>, TransportError>> {
        Box::pin(async move { Ok(*self) })
    }
}

/// Response returned by a transport
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Body reader, only consumed when the body is decoded
    pub body: Box<dyn ResponseBody>,
}

impl Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Network transport used by the pipeline
#[async_trait::async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Issue one request
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
