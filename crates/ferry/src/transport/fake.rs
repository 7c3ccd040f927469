//! Scripted transport for pipeline tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use super::{ResponseBody, Transport, TransportError, TransportRequest, TransportResponse};
use crate::headers::Headers;

/// Body reader that counts how often it was read
pub(crate) struct FakeBody {
    bytes: Option<Vec<u8>>,
    reads: Arc<AtomicUsize>,
}

impl FakeBody {
    pub(crate) fn new(bytes: Vec<u8>) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                bytes: Some(bytes),
                reads: reads.clone(),
            },
            reads,
        )
    }

    pub(crate) fn failing() -> Self {
        Self {
            bytes: None,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ResponseBody for FakeBody {
    fn bytes(self: Box<Self>) -> BoxFuture<'static, Result<Vec<u8>, TransportError>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.bytes
                .ok_or_else(|| TransportError::Other("body stream broke".to_string()))
        })
    }
}

/// Body reader that never yields
pub(crate) struct StalledBody;

impl ResponseBody for StalledBody {
    fn bytes(self: Box<Self>) -> BoxFuture<'static, Result<Vec<u8>, TransportError>> {
        Box::pin(futures::future::pending())
    }
}

/// What the fake answers with
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Respond {
        status: u16,
        headers: Headers,
        body: Vec<u8>,
    },
    /// Answers with headers, then never delivers the body
    Stall(u16),
    /// Never answers; fails with `Cancelled` once the token fires
    Hang,
    Fail(TransportError),
}

impl Reply {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            headers: [("Content-Type", "application/json")].into_iter().collect(),
            body: body.as_bytes().to_vec(),
        }
    }

    pub(crate) fn text(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            headers: [("Content-Type", "text/plain")].into_iter().collect(),
            body: body.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<TransportRequest>>,
    body_reads: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub(crate) fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Default::default()
        })
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    pub(crate) fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let cancellation = request.cancellation.clone();
        self.requests.lock().expect("lock poisoned").push(request);

        let reply = self
            .replies
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Reply::Hang);

        match reply {
            Reply::Respond {
                status,
                headers,
                body,
            } => Ok(TransportResponse {
                status,
                headers,
                body: Box::new(FakeBody {
                    bytes: Some(body),
                    reads: self.body_reads.clone(),
                }),
            }),
            Reply::Stall(status) => Ok(TransportResponse {
                status,
                headers: [("Content-Type", "application/json")].into_iter().collect(),
                body: Box::new(StalledBody),
            }),
            Reply::Hang => {
                cancellation.cancelled().await;
                Err(TransportError::Cancelled)
            }
            Reply::Fail(err) => Err(err),
        }
    }
}
