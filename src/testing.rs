//! Test utilities: a recording in-memory transport.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use whisk::testing::MockTransport;
//! use whisk::{Dictionary, WhiskClient};
//!
//! let mock = MockTransport::new();
//! mock.respond_json(serde_json::json!({"activationId": "a1"}));
//!
//! let client = WhiskClient::builder().transport(Arc::new(mock.clone())).build().unwrap();
//! let reply = client.invoke("hello", &Dictionary::new()).unwrap();
//!
//! assert_eq!(reply["activationId"], "a1");
//! mock.assert_posted("/api/v1/namespaces/_/actions/hello?blocking=true");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::errors::WhiskError;
use crate::transport::{BoxFuture, Transport};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// The request body parsed as JSON, `Null` if it is not valid JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

enum Reply {
    Body(Vec<u8>),
    NoResponse(String),
}

/// In-memory [`Transport`] that records requests and plays back queued
/// replies in order. With nothing queued it answers `{}`.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    requests: Vec<RecordedRequest>,
    replies: VecDeque<Reply>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("MockTransport")
            .field("requests", &inner.requests.len())
            .field("queued_replies", &inner.replies.len())
            .finish()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response body.
    pub fn respond_with(&self, body: impl Into<Vec<u8>>) {
        let mut inner = self.inner.lock().unwrap();
        inner.replies.push_back(Reply::Body(body.into()));
    }

    /// Queue a JSON response body.
    pub fn respond_json(&self, body: serde_json::Value) {
        self.respond_with(body.to_string());
    }

    /// Queue a failure where no response arrives.
    pub fn fail_with(&self, detail: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        inner.replies.push_back(Reply::NoResponse(detail.into()));
    }

    /// Return all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Assert that at least one request was posted to `path`.
    pub fn assert_posted(&self, path: &str) {
        let inner = self.inner.lock().unwrap();
        assert!(
            inner.requests.iter().any(|r| r.path == path),
            "Expected a request to '{}', found: {:?}",
            path,
            inner.requests.iter().map(|r| &r.path).collect::<Vec<_>>()
        );
    }

    /// Assert the exact number of requests made.
    pub fn assert_request_count(&self, expected: usize) {
        let inner = self.inner.lock().unwrap();
        assert_eq!(
            inner.requests.len(),
            expected,
            "Expected {} request(s), found {}",
            expected,
            inner.requests.len()
        );
    }

    /// Forget recorded requests and queued replies.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.clear();
        inner.replies.clear();
    }
}

impl Transport for MockTransport {
    fn post(&self, path: &str, body: Vec<u8>) -> BoxFuture<'_, crate::Result<Vec<u8>>> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(RecordedRequest {
                path: path.to_string(),
                body,
            });
            inner.replies.pop_front()
        };

        Box::pin(async move {
            match reply {
                Some(Reply::Body(body)) => Ok(body),
                Some(Reply::NoResponse(detail)) => Err(WhiskError::NoResponse(detail)),
                None => Ok(b"{}".to_vec()),
            }
        })
    }
}
