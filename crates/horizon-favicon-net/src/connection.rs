//! The connection seam between favicon suppliers and the HTTP stack.
//!
//! Suppliers never talk to the network directly; they ask a
//! [`ConnectionFactory`] for a [`Connection`] to a URL. Production code uses
//! [`HttpClient`](crate::HttpClient); tests substitute
//! [`MemoryConnectionFactory`](crate::MemoryConnectionFactory).
//!
//! A connection is released when it is dropped, so every exit path of a
//! fetch (success, "no favicon", failure) gives it back.

use bytes::Bytes;
use url::Url;

use crate::error::Result;

/// An open HTTP exchange whose headers have been received.
pub trait Connection: Send {
    /// The URL the response was served from, after any redirects.
    fn url(&self) -> &str;

    /// The HTTP status code.
    fn status(&self) -> u16;

    /// The `Content-Type` header, if present.
    fn content_type(&self) -> Option<&str>;

    /// Read the full response body.
    ///
    /// Can be called once; later calls fail with
    /// [`NetworkError::BodyConsumed`](crate::NetworkError::BodyConsumed).
    fn read_body(&mut self) -> Result<Bytes>;

    /// Returns `true` for a 2xx status.
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }
}

/// Opens connections. Stateless from the caller's point of view and shared
/// across background threads.
pub trait ConnectionFactory: Send + Sync {
    /// Send a GET request to `url` and return once headers are available.
    fn open(&self, url: &Url) -> Result<Box<dyn Connection>>;
}

impl<F: ConnectionFactory + ?Sized> ConnectionFactory for std::sync::Arc<F> {
    fn open(&self, url: &Url) -> Result<Box<dyn Connection>> {
        (**self).open(url)
    }
}
