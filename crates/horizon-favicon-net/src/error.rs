//! Failures reported by connection factories.

use std::fmt;

/// Why a connection could not be opened or its body read.
///
/// Variants carry rendered messages rather than source errors so the type
/// stays `Clone` and comparable; the in-memory factory replays the same
/// failure on every request and tests assert on it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The request failed after a connection was made.
    Request(String),
    InvalidUrl(String),
    /// A request or connect deadline passed.
    Timeout,
    /// DNS, TCP or TLS setup failed.
    Connection(String),
    Io(String),
    /// The connection factory could not be configured.
    Config(String),
    /// The body grew past the factory's byte cap.
    BodyTooLarge { limit: usize },
    /// [`read_body`](crate::Connection::read_body) was called twice.
    BodyConsumed,
    /// The in-memory factory has nothing registered for this URL.
    Unroutable(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(detail) => write!(f, "request failed: {detail}"),
            Self::InvalidUrl(detail) => write!(f, "bad url: {detail}"),
            Self::Timeout => f.write_str("timed out"),
            Self::Connection(detail) => write!(f, "could not connect: {detail}"),
            Self::Io(detail) => write!(f, "i/o failure: {detail}"),
            Self::Config(detail) => write!(f, "bad connection settings: {detail}"),
            Self::BodyTooLarge { limit } => write!(f, "body larger than {limit} bytes"),
            Self::BodyConsumed => f.write_str("body already read"),
            Self::Unroutable(url) => write!(f, "no response registered for {url}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        let detail = err.to_string();
        if err.is_connect() {
            Self::Connection(detail)
        } else {
            Self::Request(detail)
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Io(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(NetworkError::Timeout.to_string(), "timed out");
        assert_eq!(
            NetworkError::BodyTooLarge { limit: 10 }.to_string(),
            "body larger than 10 bytes"
        );
        assert_eq!(
            NetworkError::Unroutable("https://x.example/".into()).to_string(),
            "no response registered for https://x.example/"
        );
    }

    #[test]
    fn test_url_parse_failure_maps_to_invalid_url() {
        let err: NetworkError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, NetworkError::InvalidUrl(_)));
    }

    #[test]
    fn test_io_timeout_maps_to_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert_eq!(NetworkError::from(io), NetworkError::Timeout);
    }
}
