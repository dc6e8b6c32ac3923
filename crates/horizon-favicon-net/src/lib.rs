//! Networking module for Horizon Favicon.
//!
//! This crate provides the connection layer favicon suppliers fetch through:
//!
//! - **Connection seam**: [`Connection`] and [`ConnectionFactory`] traits, so
//!   suppliers never open sockets themselves
//! - **HTTP client**: [`HttpClient`], a reqwest-backed factory with timeouts,
//!   redirect policy and a response size cap
//! - **In-memory factory**: [`MemoryConnectionFactory`] for tests without
//!   network access
//!
//! # Configuration
//!
//! ```no_run
//! use horizon_favicon_net::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(15))
//!     .connect_timeout(Duration::from_secs(3))
//!     .max_body_bytes(256 * 1024)
//!     .build()?;
//! # Ok::<(), horizon_favicon_net::NetworkError>(())
//! ```

mod connection;
mod error;
pub mod http;
pub mod memory;

pub use connection::{Connection, ConnectionFactory};
pub use error::{NetworkError, Result};

// Re-export commonly used types at the crate root
pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, HttpConnection};
pub use memory::{CannedResponse, MemoryConnectionFactory};
