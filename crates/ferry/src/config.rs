//! Request configuration and client defaults

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DurationMilliSeconds};
use tokio_util::sync::CancellationToken;

use crate::body::RequestBody;
use crate::headers::Headers;
use crate::method::Method;

/// Transport-specific options forwarded untouched (e.g. `cache`)
pub type Passthrough = BTreeMap<String, Value>;

/// Credentials policy, following fetch semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    /// Never send cookies or auth
    Omit,
    /// Send cookies and auth to the same origin only
    #[default]
    SameOrigin,
    /// Always send cookies and auth
    Include,
}

/// Per-call request configuration
///
/// Every field is optional; unset fields are filled from [`ClientDefaults`]
/// when the request is resolved.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Path or absolute URL
    pub url: String,
    /// HTTP method
    pub method: Option<Method>,
    /// Base URL overriding the client's
    pub base_url: Option<String>,
    /// Headers overriding same-named default headers
    pub headers: Headers,
    /// Request body
    pub body: Option<RequestBody>,
    /// Query parameters, appended after the default ones
    pub params: Vec<(String, String)>,
    /// Timeout for the transport call
    pub timeout: Option<Duration>,
    /// Force credentials to be included
    pub with_credentials: Option<bool>,
    /// Explicit credentials policy
    pub credentials: Option<Credentials>,
    /// Caller-owned cancellation token
    pub cancellation: Option<CancellationToken>,
    /// Options forwarded verbatim to the transport
    pub passthrough: Passthrough,
}

impl RequestConfig {
    /// Create a config for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the method
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the with-credentials flag
    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = Some(with_credentials);
        self
    }

    /// Set the credentials policy
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use a caller-owned cancellation token
    ///
    /// When set, no internal timeout timer is armed for the call.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Add a transport passthrough option
    pub fn passthrough(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.passthrough.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for RequestConfig {
    fn from(url: &str) -> Self {
        RequestConfig::new(url)
    }
}

impl From<String> for RequestConfig {
    fn from(url: String) -> Self {
        RequestConfig::new(url)
    }
}

/// Client-wide defaults read on every call
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDefaults {
    /// Base URL joined with relative request paths
    pub base_url: Option<String>,
    /// Default headers
    pub headers: Headers,
    /// Default method
    pub method: Option<Method>,
    /// Default timeout, in milliseconds when serialized
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub timeout: Option<Duration>,
    /// Default credentials policy
    pub credentials: Option<Credentials>,
    /// Default with-credentials flag
    pub with_credentials: Option<bool>,
    /// Query parameters added to every call
    pub params: Vec<(String, String)>,
    /// Transport options added to every call
    pub passthrough: Passthrough,
}

/// Fully resolved description of one call
///
/// Produced by [`crate::merge::merge`]: the URL is absolute (or left for the
/// transport to resolve), the method is concrete and a structured body has
/// already been encoded. Request hooks receive and may replace it.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Final URL including query string
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Merged headers
    pub headers: Headers,
    /// Encoded body
    pub body: Option<RequestBody>,
    /// Timeout for the transport call
    pub timeout: Option<Duration>,
    /// Caller-owned cancellation token
    pub cancellation: Option<CancellationToken>,
    /// Resolved credentials policy
    pub credentials: Credentials,
    /// Options forwarded verbatim to the transport
    pub passthrough: Passthrough,
}
