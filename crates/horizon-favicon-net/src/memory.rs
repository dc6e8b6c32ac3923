//! In-memory connection factory for deterministic tests.
//!
//! Routes are keyed by the exact URL string. Every request is recorded, and
//! the factory tracks how many connections are currently open so tests can
//! assert that callers release them.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use url::Url;

use crate::connection::{Connection, ConnectionFactory};
use crate::error::{NetworkError, Result};

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl CannedResponse {
    /// A 200 response with the given content type and body.
    pub fn ok(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }

    /// An empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Bytes::new(),
        }
    }

    /// Replace the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

#[derive(Debug, Clone)]
enum Route {
    Respond(CannedResponse),
    Fail(NetworkError),
}

/// A [`ConnectionFactory`] serving canned responses from memory.
#[derive(Default)]
pub struct MemoryConnectionFactory {
    routes: Mutex<HashMap<String, Route>>,
    fallback: Mutex<Option<CannedResponse>>,
    requests: Mutex<Vec<String>>,
    open: Arc<AtomicUsize>,
}

impl MemoryConnectionFactory {
    /// Create a factory with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `url`.
    pub fn respond(&self, url: impl Into<String>, response: CannedResponse) -> &Self {
        self.routes.lock().insert(url.into(), Route::Respond(response));
        self
    }

    /// Fail to connect to `url` with `error`.
    pub fn fail(&self, url: impl Into<String>, error: NetworkError) -> &Self {
        self.routes.lock().insert(url.into(), Route::Fail(error));
        self
    }

    /// Serve `response` for every URL without an explicit route.
    pub fn fallback(&self, response: CannedResponse) -> &Self {
        *self.fallback.lock() = Some(response);
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of connections handed out and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }
}

impl ConnectionFactory for MemoryConnectionFactory {
    fn open(&self, url: &Url) -> Result<Box<dyn Connection>> {
        let key = url.as_str().to_string();
        self.requests.lock().push(key.clone());

        let route = self.routes.lock().get(&key).cloned();
        let response = match route {
            Some(Route::Respond(response)) => response,
            Some(Route::Fail(error)) => return Err(error),
            None => self
                .fallback
                .lock()
                .clone()
                .ok_or(NetworkError::Unroutable(key.clone()))?,
        };

        self.open.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(MemoryConnection {
            url: key,
            response,
            consumed: false,
            open: self.open.clone(),
        }))
    }
}

impl std::fmt::Debug for MemoryConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnectionFactory")
            .field("routes", &self.routes.lock().len())
            .field("requests", &self.request_count())
            .field("open", &self.open_connections())
            .finish()
    }
}

struct MemoryConnection {
    url: String,
    response: CannedResponse,
    consumed: bool,
    open: Arc<AtomicUsize>,
}

impl Connection for MemoryConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> u16 {
        self.response.status
    }

    fn content_type(&self) -> Option<&str> {
        self.response.content_type.as_deref()
    }

    fn read_body(&mut self) -> Result<Bytes> {
        if self.consumed {
            return Err(NetworkError::BodyConsumed);
        }
        self.consumed = true;
        Ok(self.response.body.clone())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::AcqRel);
    }
}
