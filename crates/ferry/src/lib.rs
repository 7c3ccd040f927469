//! Fetch-style HTTP client with hooks
//!
//! This crate wraps a network transport with the pieces most API clients end
//! up rewriting: method shortcuts, a base URL and default headers, JSON
//! request bodies, timeouts, rejection of non-2xx statuses and ordered
//! request/response hooks. Every failure surfaces as one [`HttpError`] type.
//!
//! # Example
//!
//! ```no_run
//! use ferry::{Client, Hook, Response};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct ApiResponse {
//!     message: String,
//! }
//!
//! async fn example() -> Response<String> {
//!     let mut client = Client::new();
//!     client.set_base_url("https://api.example.com");
//!     client.interceptors_mut().request.register(Hook::fulfilled(|mut config: ferry::ResolvedConfig| async move {
//!         config.headers.insert("Authorization", "Bearer token");
//!         Ok(config)
//!     }));
//!
//!     let payload = client.get("/data").await?;
//!     let response: ApiResponse = payload.json().unwrap_or(ApiResponse {
//!         message: String::new(),
//!     });
//!     Ok(response.message)
//! }
//! ```

mod body;
mod client;
mod config;
mod error;
mod headers;
mod hooks;
pub mod merge;
mod method;
mod pipeline;
mod response;
mod timer;
pub mod transport;

pub use body::{Payload, RequestBody};
pub use client::{fetch, Client, ClientBuilder};
pub use config::{ClientDefaults, Credentials, Passthrough, RequestConfig, ResolvedConfig};
pub use error::HttpError;
pub use headers::Headers;
pub use hooks::{FulfilledFn, Hook, HookChain, HookId, Interceptors, RejectedFn, Recovery};
pub use method::{Method, UnknownMethod};
pub use pipeline::Pipeline;
pub use response::{ResolvedResponse, Response};
pub use timer::{Timer, TokioTimer};
pub use transport::{
    ReqwestTransport, ResponseBody, Transport, TransportError, TransportRequest,
    TransportResponse,
};
