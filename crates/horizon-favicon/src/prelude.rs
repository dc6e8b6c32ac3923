//! Common imports.
//!
//! ```
//! use horizon_favicon::prelude::*;
//! ```

pub use crate::{
    CacheState, DomainName, FaviconError, FaviconIcon, FaviconImage, FaviconRef, FaviconSupplier,
    FaviconSupport,
};
pub use horizon_favicon_core::{Dispatcher, Executor, InvocationQueue};
pub use horizon_favicon_net::{Connection, ConnectionFactory};
