//! Ordered request/response hook chains
//!
//! A [`HookChain`] holds callbacks in registration order. Ejecting a hook
//! leaves an inert slot behind, so handles issued earlier stay valid.
//!
//! Every failure of a call, including a failing request hook, is offered to
//! the response chain. Only response hooks take a failure callback.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::body::Payload;
use crate::config::ResolvedConfig;
use crate::error::HttpError;
use crate::response::ResolvedResponse;

/// Success callback: transforms the value or fails
pub type FulfilledFn<T> = Arc<dyn Fn(T) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

/// Failure callback: recovers or hands back a (possibly different) error
pub type RejectedFn =
    Arc<dyn Fn(HttpError) -> BoxFuture<'static, Result<Recovery, HttpError>> + Send + Sync>;

/// Value a failure callback recovers with
#[derive(Debug, Clone)]
pub enum Recovery {
    /// A substitute response; its `data` becomes the call's result
    Response(ResolvedResponse),
    /// A raw value returned to the caller as-is
    Value(Payload),
}

/// Handle identifying a registered hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(usize);

/// A pair of optional callbacks
///
/// Only `Hook<ResolvedResponse>` takes a failure callback. Request hooks
/// cannot carry one:
///
/// ```compile_fail
/// use ferry::{Hook, HttpError, ResolvedConfig};
///
/// let _hook: Hook<ResolvedConfig> = Hook::rejected(|err: HttpError| async move { Err(err) });
/// ```
pub struct Hook<T> {
    on_fulfilled: Option<FulfilledFn<T>>,
    on_rejected: Option<RejectedFn>,
}

impl<T> Default for Hook<T> {
    fn default() -> Self {
        Self {
            on_fulfilled: None,
            on_rejected: None,
        }
    }
}

impl<T> Clone for Hook<T> {
    fn clone(&self) -> Self {
        Self {
            on_fulfilled: self.on_fulfilled.clone(),
            on_rejected: self.on_rejected.clone(),
        }
    }
}

impl<T> fmt::Debug for Hook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("on_fulfilled", &self.on_fulfilled.is_some())
            .field("on_rejected", &self.on_rejected.is_some())
            .finish()
    }
}

impl<T: Send + 'static> Hook<T> {
    /// Hook with only a success callback
    pub fn fulfilled<F, Fut>(f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self::default().on_fulfilled(f)
    }

    /// Set the success callback
    pub fn on_fulfilled<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.on_fulfilled = Some(Arc::new(
            move |value: T| -> BoxFuture<'static, anyhow::Result<T>> { Box::pin(f(value)) },
        ));
        self
    }
}

impl Hook<ResolvedResponse> {
    /// Hook with only a failure callback
    pub fn rejected<F, Fut>(f: F) -> Self
    where
        F: Fn(HttpError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Recovery, HttpError>> + Send + 'static,
    {
        Self::default().on_rejected(f)
    }

    /// Set the failure callback
    pub fn on_rejected<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(HttpError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Recovery, HttpError>> + Send + 'static,
    {
        self.on_rejected = Some(Arc::new(
            move |err: HttpError| -> BoxFuture<'static, Result<Recovery, HttpError>> {
                Box::pin(f(err))
            },
        ));
        self
    }
}

/// Ordered registry of hooks
pub struct HookChain<T> {
    slots: Vec<Option<Hook<T>>>,
}

impl<T> Default for HookChain<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Clone for HookChain<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<T> fmt::Debug for HookChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("slots", &self.slots.len())
            .field("live", &self.len())
            .finish()
    }
}

impl<T> HookChain<T> {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook at the end of the chain
    pub fn register(&mut self, hook: Hook<T>) -> HookId {
        self.slots.push(Some(hook));
        HookId(self.slots.len() - 1)
    }

    /// Eject a hook; returns `false` if the handle was unknown or already ejected
    pub fn eject(&mut self, id: HookId) -> bool {
        match self.slots.get_mut(id.0) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Eject every hook. Handles issued later stay distinct from earlier ones.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Number of live (non-ejected) hooks
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Whether no live hooks are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pipe `value` through every success callback in order
    ///
    /// Stops at the first failing callback.
    pub async fn run_fulfilled(&self, mut value: T) -> anyhow::Result<T> {
        for hook in self.slots.iter().flatten() {
            if let Some(on_fulfilled) = &hook.on_fulfilled {
                value = on_fulfilled(value).await?;
            }
        }
        Ok(value)
    }
}

impl HookChain<ResolvedResponse> {
    /// Offer `error` to every failure callback in order
    ///
    /// The first recovery ends the chain. A callback that fails hands its
    /// error to the next one; if nobody recovers, the last error is returned.
    pub async fn run_rejected(&self, mut error: HttpError) -> Result<Recovery, HttpError> {
        for hook in self.slots.iter().flatten() {
            if let Some(on_rejected) = &hook.on_rejected {
                match on_rejected(error).await {
                    Ok(recovery) => return Ok(recovery),
                    Err(next) => error = next,
                }
            }
        }
        Err(error)
    }
}

/// The request and response hook chains of a client
#[derive(Debug, Clone, Default)]
pub struct Interceptors {
    /// Runs over the resolved config before dispatch; success callbacks only
    pub request: HookChain<ResolvedConfig>,
    /// Runs over the response, and over every failure
    pub response: HookChain<ResolvedResponse>,
}
