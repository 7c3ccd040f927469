//! HTTP client facade

use std::sync::Arc;
use std::time::Duration;

use crate::body::{Payload, RequestBody};
use crate::config::{ClientDefaults, RequestConfig};
use crate::hooks::Interceptors;
use crate::method::Method;
use crate::pipeline::Pipeline;
use crate::response::Response;
use crate::timer::{Timer, TokioTimer};
use crate::transport::{ReqwestTransport, Transport};

/// HTTP client
///
/// Holds the client-wide defaults and the two hook chains. Every call
/// resolves its own copy of the config, so changing defaults never affects
/// calls already in flight.
#[derive(Debug, Clone)]
pub struct Client {
    defaults: ClientDefaults,
    interceptors: Interceptors,
    pipeline: Pipeline,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client with empty defaults and the reqwest transport
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client with the given defaults and the reqwest transport
    pub fn with_defaults(defaults: ClientDefaults) -> Self {
        Self::builder().defaults(defaults).build()
    }

    /// Create a new client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    // === Defaults ===

    /// Client-wide defaults
    pub fn defaults(&self) -> &ClientDefaults {
        &self.defaults
    }

    /// Mutable access to the client-wide defaults
    pub fn defaults_mut(&mut self) -> &mut ClientDefaults {
        &mut self.defaults
    }

    /// Set the base URL joined with relative request paths
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.defaults.base_url = Some(base_url.into());
    }

    /// Set a default header (case-insensitive name)
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.defaults.headers.insert(name, value);
    }

    /// Remove a default header (case-insensitive name)
    pub fn remove_header(&mut self, name: impl AsRef<str>) {
        self.defaults.headers.remove(name);
    }

    /// Set the default timeout
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.defaults.timeout = timeout;
    }

    /// Set the default method
    pub fn set_default_method(&mut self, method: Method) {
        self.defaults.method = Some(method);
    }

    // === Hooks ===

    /// Request and response hook chains
    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    /// Mutable access to the hook chains, for registering and ejecting hooks
    pub fn interceptors_mut(&mut self) -> &mut Interceptors {
        &mut self.interceptors
    }

    // === Calls ===

    /// Issue a request described by `config`
    pub async fn request(&self, config: impl Into<RequestConfig>) -> Response<Payload> {
        self.pipeline
            .execute(&self.defaults, &self.interceptors, config.into())
            .await
    }

    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody>,
        config: Option<RequestConfig>,
    ) -> Response<Payload> {
        let mut config = config.unwrap_or_default();
        config.url = url.to_string();
        config.method = Some(method);
        if body.is_some() {
            config.body = body;
        }
        self.request(config).await
    }

    /// GET request
    pub async fn get(&self, url: &str) -> Response<Payload> {
        self.call(Method::Get, url, None, None).await
    }

    /// GET request with extra config
    pub async fn get_with(&self, url: &str, config: RequestConfig) -> Response<Payload> {
        self.call(Method::Get, url, None, Some(config)).await
    }

    /// DELETE request
    pub async fn delete(&self, url: &str) -> Response<Payload> {
        self.call(Method::Delete, url, None, None).await
    }

    /// DELETE request with extra config
    pub async fn delete_with(&self, url: &str, config: RequestConfig) -> Response<Payload> {
        self.call(Method::Delete, url, None, Some(config)).await
    }

    /// HEAD request
    pub async fn head(&self, url: &str) -> Response<Payload> {
        self.call(Method::Head, url, None, None).await
    }

    /// HEAD request with extra config
    pub async fn head_with(&self, url: &str, config: RequestConfig) -> Response<Payload> {
        self.call(Method::Head, url, None, Some(config)).await
    }

    /// OPTIONS request
    pub async fn options(&self, url: &str) -> Response<Payload> {
        self.call(Method::Options, url, None, None).await
    }

    /// OPTIONS request with extra config
    pub async fn options_with(&self, url: &str, config: RequestConfig) -> Response<Payload> {
        self.call(Method::Options, url, None, Some(config)).await
    }

    /// POST request with a body
    pub async fn post(&self, url: &str, body: impl Into<RequestBody>) -> Response<Payload> {
        self.call(Method::Post, url, Some(body.into()), None).await
    }

    /// POST request with an optional body and extra config
    pub async fn post_with(
        &self,
        url: &str,
        body: Option<RequestBody>,
        config: RequestConfig,
    ) -> Response<Payload> {
        self.call(Method::Post, url, body, Some(config)).await
    }

    /// PUT request with a body
    pub async fn put(&self, url: &str, body: impl Into<RequestBody>) -> Response<Payload> {
        self.call(Method::Put, url, Some(body.into()), None).await
    }

    /// PUT request with an optional body and extra config
    pub async fn put_with(
        &self,
        url: &str,
        body: Option<RequestBody>,
        config: RequestConfig,
    ) -> Response<Payload> {
        self.call(Method::Put, url, body, Some(config)).await
    }

    /// PATCH request with a body
    pub async fn patch(&self, url: &str, body: impl Into<RequestBody>) -> Response<Payload> {
        self.call(Method::Patch, url, Some(body.into()), None).await
    }

    /// PATCH request with an optional body and extra config
    pub async fn patch_with(
        &self,
        url: &str,
        body: Option<RequestBody>,
        config: RequestConfig,
    ) -> Response<Payload> {
        self.call(Method::Patch, url, body, Some(config)).await
    }
}

/// Client builder for injecting defaults, transport and timer
#[derive(Debug, Default)]
pub struct ClientBuilder {
    defaults: ClientDefaults,
    transport: Option<Arc<dyn Transport>>,
    timer: Option<Arc<dyn Timer>>,
}

impl ClientBuilder {
    /// Set the client-wide defaults
    pub fn defaults(mut self, defaults: ClientDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.defaults.base_url = Some(base_url.into());
        self
    }

    /// Add a default header
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.defaults.headers.insert(name, value);
        self
    }

    /// Set the default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.defaults.timeout = Some(timeout);
        self
    }

    /// Use a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom timer
    pub fn timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Build the client
    pub fn build(self) -> Client {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let timer = self.timer.unwrap_or_else(|| Arc::new(TokioTimer));

        Client {
            defaults: self.defaults,
            interceptors: Interceptors::default(),
            pipeline: Pipeline::new(transport, timer),
        }
    }
}

/// Convenience function for a one-off GET request
pub async fn fetch(url: &str) -> Response<Payload> {
    Client::new().get(url).await
}
