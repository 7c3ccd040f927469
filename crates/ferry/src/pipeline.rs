//! Request pipeline
//!
//! One call goes through: merge defaults, request hooks, transport dispatch
//! (with an optional timeout timer), response normalization and response
//! hooks. Any failure after merging is normalized into an [`HttpError`] and
//! offered once to the response failure hooks, which may recover it.

use std::pin::pin;
use std::sync::Arc;

use futures::future::{self, Either};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::body::Payload;
use crate::config::{ClientDefaults, RequestConfig, ResolvedConfig};
use crate::error::HttpError;
use crate::headers::Headers;
use crate::hooks::{Interceptors, Recovery};
use crate::merge::merge;
use crate::response::{decode_body, ResolvedResponse};
use crate::timer::Timer;
use crate::transport::{Transport, TransportError, TransportRequest};

/// Executes requests against an injected transport and timer
#[derive(Debug, Clone)]
pub struct Pipeline {
    transport: Arc<dyn Transport>,
    timer: Arc<dyn Timer>,
}

impl Pipeline {
    /// Create a pipeline
    pub fn new(transport: Arc<dyn Transport>, timer: Arc<dyn Timer>) -> Self {
        Self { transport, timer }
    }

    /// Run one call to completion
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn execute(
        &self,
        defaults: &ClientDefaults,
        interceptors: &Interceptors,
        config: RequestConfig,
    ) -> Result<Payload, HttpError> {
        let resolved = merge(defaults, config);
        tracing::debug!(method = %resolved.method, url = %resolved.url, "Resolved request");

        let resolved = match interceptors.request.run_fulfilled(resolved.clone()).await {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Request hook failed: {}", err);
                return recover(interceptors, HttpError::hook(err, resolved)).await;
            }
        };

        let response = match self.dispatch(&resolved).await {
            Ok(response) => response,
            Err(err) => return recover(interceptors, err).await,
        };

        match interceptors.response.run_fulfilled(response).await {
            Ok(response) => Ok(response.data),
            Err(err) => {
                tracing::warn!("Response hook failed: {}", err);
                recover(interceptors, HttpError::hook(err, resolved)).await
            }
        }
    }

    /// Send the request and normalize whatever comes back
    ///
    /// The timeout covers the whole exchange, body included. A caller-owned
    /// token disables the internal timer. The timer future is dropped on
    /// every exit from this function.
    async fn dispatch(&self, config: &ResolvedConfig) -> Result<ResolvedResponse, HttpError> {
        let (token, timeout) = match &config.cancellation {
            Some(token) => (token.clone(), None),
            None => (CancellationToken::new(), config.timeout),
        };

        let exchange = pin!(self.exchange(config, token.clone()));
        let outcome = match timeout {
            None => exchange.await,
            Some(timeout) => match future::select(exchange, self.timer.sleep(timeout)).await {
                Either::Left((outcome, _timer)) => outcome,
                Either::Right(((), _in_flight)) => {
                    tracing::debug!(timeout_ms = %timeout.as_millis(), "Request timed out");
                    token.cancel();
                    Err(TransportError::Cancelled)
                }
            },
        };
        let (status, headers, data) = outcome.map_err(|err| classify(err, config))?;
        let response = ResolvedResponse::new(status, headers, data, config.clone());

        if !response.is_success() {
            tracing::debug!(status, "Request failed with non-2xx status");
            return Err(HttpError::status(response));
        }
        Ok(response)
    }

    /// Call the transport and decode the body, giving up once `token` fires
    async fn exchange(
        &self,
        config: &ResolvedConfig,
        token: CancellationToken,
    ) -> Result<(u16, Headers, Payload), TransportError> {
        let request = TransportRequest::from_config(config, token.clone());
        tracing::trace!(method = %request.method, url = %request.url, "Dispatching request");
        let response = self.transport.send(request).await?;

        let status = response.status;
        let headers = response.headers;
        let data = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(TransportError::Cancelled),
            data = decode_body(status, &headers, response.body) => data,
        };
        Ok((status, headers, data))
    }
}

/// Map a transport failure onto the error taxonomy
fn classify(err: TransportError, config: &ResolvedConfig) -> HttpError {
    if err.is_cancellation() {
        HttpError::timeout(config.timeout, config.clone())
    } else {
        tracing::debug!("Transport failed: {}", err);
        HttpError::transport(err.to_string(), config.clone())
    }
}

/// Offer a failure to the response failure hooks
async fn recover(interceptors: &Interceptors, error: HttpError) -> Result<Payload, HttpError> {
    match interceptors.response.run_rejected(error).await {
        Ok(Recovery::Response(response)) => {
            tracing::debug!(status = response.status, "Failure recovered with a response");
            Ok(response.data)
        }
        Ok(Recovery::Value(payload)) => {
            tracing::debug!("Failure recovered with a value");
            Ok(payload)
        }
        Err(err) => Err(err),
    }
}
