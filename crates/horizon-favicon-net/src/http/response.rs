//! HTTP response types.

use bytes::{Bytes, BytesMut};
use horizon_favicon_core::logging::targets;

use super::runtime;
use crate::connection::Connection;
use crate::error::{NetworkError, Result};

/// A [`Connection`] over a reqwest response.
///
/// Dropping it releases the underlying connection back to the pool (or
/// closes it when the body was not read to the end).
pub struct HttpConnection {
    url: String,
    status: u16,
    content_type: Option<String>,
    max_body_bytes: usize,
    inner: Option<reqwest::Response>,
}

impl HttpConnection {
    pub(crate) fn new(response: reqwest::Response, max_body_bytes: usize) -> Self {
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            url: response.url().to_string(),
            status: response.status().as_u16(),
            content_type,
            max_body_bytes,
            inner: Some(response),
        }
    }
}

impl Connection for HttpConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn read_body(&mut self) -> Result<Bytes> {
        let mut response = self.inner.take().ok_or(NetworkError::BodyConsumed)?;
        let limit = self.max_body_bytes;

        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(NetworkError::BodyTooLarge { limit });
        }

        // Stream with a size cap; Content-Length may be absent or wrong.
        let body = runtime::block_on(async move {
            let mut buffer = BytesMut::new();
            while let Some(chunk) = response.chunk().await? {
                if buffer.len() + chunk.len() > limit {
                    return Err(NetworkError::BodyTooLarge { limit });
                }
                buffer.extend_from_slice(&chunk);
            }
            Ok::<Bytes, NetworkError>(buffer.freeze())
        })??;

        tracing::trace!(target: targets::NET, url = %self.url, bytes = body.len(), "body read");
        Ok(body)
    }
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("status", &self.status)
            .field("url", &self.url)
            .field("content_type", &self.content_type)
            .finish()
    }
}
