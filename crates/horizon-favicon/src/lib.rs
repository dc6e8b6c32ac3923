//! Horizon Favicon - asynchronous favicon fetching and caching for desktop UIs.
//!
//! A UI asks [`FaviconSupport`] for the icon of a `(domain, size)` pair and
//! gets an answer at once: the cached favicon, or the fallback it passed in.
//! A miss schedules a background resolution that tries each
//! [`FaviconSupplier`] in rank order, walking up to parent domains when none
//! of them has an icon. The outcome is stored from the dispatcher thread,
//! which then calls the update observer so the host can repaint.
//!
//! # Example
//!
//! ```no_run
//! use horizon_favicon::{FaviconImage, FaviconRef, FaviconSupport};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let support = FaviconSupport::builder()
//!         .on_update(|favicon| println!("repaint {favicon}"))
//!         .build()?;
//!
//!     let fallback = FaviconImage::solid(16, [160, 160, 160, 255]);
//!     let icon = support.icon(FaviconRef::parse("www.rust-lang.org", 16)?, fallback);
//!
//!     // Called from paint code; returns the fallback until the fetch lands.
//!     let _pixels = icon.current();
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Everything is instrumented with `tracing`. See
//! [`horizon_favicon_core::logging::targets`] for the target names.

mod domain;
mod error;
mod favicon_image;
mod favicon_ref;
pub mod prelude;
pub mod supplier;
mod support;

pub use domain::DomainName;
pub use error::{FaviconError, Result};
pub use favicon_image::{FaviconImage, MAX_ICON_SIZE};
pub use favicon_ref::FaviconRef;
pub use supplier::{
    DirectSupplier, DuckDuckGoSupplier, FaviconSupplier, GoogleSupplier, IconHorseSupplier,
    YandexSupplier, default_suppliers, sort_by_rank,
};
pub use support::{
    AttemptOutcome, CacheState, ErrorObserver, FaviconIcon, FaviconSupport,
    FaviconSupportBuilder, FetchReport, MessageObserver, RESOLUTION_STAGE, UpdateObserver,
};

/// The connection layer suppliers fetch through.
pub mod net {
    pub use horizon_favicon_net::*;
}
