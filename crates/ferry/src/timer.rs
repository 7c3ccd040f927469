//! Timer capability used to arm request timeouts

use std::fmt::Debug;
use std::time::Duration;

/// Source of delays
#[async_trait::async_trait]
pub trait Timer: Send + Sync + Debug {
    /// Complete after `duration` has elapsed
    async fn sleep(&self, duration: Duration);
}

/// Timer backed by the tokio clock
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait::async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}
