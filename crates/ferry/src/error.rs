//! HTTP error types

use std::time::Duration;

use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::response::ResolvedResponse;

/// Errors a client call can end with
///
/// Every failure of the request pipeline is normalized into one of these
/// variants, and each carries the config that was in effect.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// A request or response hook failed
    #[error("{message}")]
    Hook {
        /// Failure message
        message: String,
        /// Config in effect
        config: Box<ResolvedConfig>,
    },
    /// The server answered with a status outside 2xx
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The received response
        response: Box<ResolvedResponse>,
    },
    /// The transport failed for a reason other than cancellation
    #[error("{message}")]
    Transport {
        /// Failure message
        message: String,
        /// Config in effect
        config: Box<ResolvedConfig>,
    },
    /// The call was cancelled by its timeout or cancellation token
    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout {
        /// Configured timeout in milliseconds, 0 when none was set
        timeout_ms: u128,
        /// Config in effect
        config: Box<ResolvedConfig>,
    },
}

impl HttpError {
    pub(crate) fn hook(err: anyhow::Error, config: ResolvedConfig) -> Self {
        HttpError::Hook {
            message: err.to_string(),
            config: Box::new(config),
        }
    }

    pub(crate) fn status(response: ResolvedResponse) -> Self {
        HttpError::Status {
            status: response.status,
            response: Box::new(response),
        }
    }

    pub(crate) fn transport(message: impl Into<String>, config: ResolvedConfig) -> Self {
        HttpError::Transport {
            message: message.into(),
            config: Box::new(config),
        }
    }

    pub(crate) fn timeout(timeout: Option<Duration>, config: ResolvedConfig) -> Self {
        HttpError::Timeout {
            timeout_ms: timeout.map(|t| t.as_millis()).unwrap_or_default(),
            config: Box::new(config),
        }
    }

    /// HTTP status: the response status, `0` for a timeout, none otherwise
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Timeout { .. } => Some(0),
            HttpError::Hook { .. } | HttpError::Transport { .. } => None,
        }
    }

    /// The response, when one was received before failing
    pub fn response(&self) -> Option<&ResolvedResponse> {
        match self {
            HttpError::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Config in effect when the failure was raised
    pub fn config(&self) -> &ResolvedConfig {
        match self {
            HttpError::Hook { config, .. }
            | HttpError::Transport { config, .. }
            | HttpError::Timeout { config, .. } => config,
            HttpError::Status { response, .. } => &response.config,
        }
    }

    /// Human readable message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the call timed out or was cancelled
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout { .. })
    }
}
