//! reqwest-backed connections.
//!
//! # Example
//!
//! ```no_run
//! use horizon_favicon_net::{ConnectionFactory, HttpClient};
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .user_agent("MyApp/1.0")
//!     .build()?;
//!
//! let url = url::Url::parse("https://example.com/favicon.ico")?;
//! let mut connection = client.open(&url)?;
//! println!("Status: {}", connection.status());
//! let body = connection.read_body()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod response;
pub mod runtime;

pub use client::{DEFAULT_MAX_BODY_BYTES, HttpClient, HttpClientBuilder, HttpClientConfig};
pub use response::HttpConnection;
