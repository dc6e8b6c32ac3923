//! Error types for favicon lookups.

use horizon_favicon_core::CoreError;
use horizon_favicon_net::NetworkError;
use thiserror::Error;

/// Errors that can occur while building references or fetching favicons.
#[derive(Error, Debug)]
pub enum FaviconError {
    /// A domain name did not match the hostname grammar.
    #[error("invalid domain name '{input}': {reason}")]
    InvalidFormat {
        /// The rejected text.
        input: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// An argument was outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A URL carried no host to derive a domain from.
    #[error("URL has no host: {0}")]
    MissingHost(String),

    /// A provider URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Opening a connection or reading the body failed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The response body was not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The provider answered with a status it never uses for success or
    /// for "no favicon".
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The URL that answered, after any redirects.
        url: String,
    },

    /// A supplier panicked instead of returning.
    #[error("supplier panicked: {0}")]
    SupplierPanicked(String),

    /// Resolution panicked outside any supplier, for example in an observer.
    #[error("favicon resolution panicked: {0}")]
    ResolutionPanicked(String),

    /// Execution resources could not be created.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for favicon operations.
pub type Result<T> = std::result::Result<T, FaviconError>;
