//! The favicon cache and its background resolution.
//!
//! [`FaviconSupport`] answers every lookup immediately. A miss marks the ref
//! as pending and hands a resolution task to the executor; the task walks the
//! suppliers (and, unless disabled, the parent domains) off the UI thread,
//! then dispatches the outcome back to the dispatcher, which fills the cache
//! and fires the update observer.
//!
//! The cache is written only from dispatched closures, apart from the pending
//! mark that a lookup itself sets. If the executor or dispatcher drops the
//! work without running it, the pending mark is cleared so a later lookup
//! schedules the ref again.

mod builder;
mod icon;
mod report;

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Instant;

use horizon_favicon_core::logging::targets;
use horizon_favicon_core::{Dispatcher, Executor};
use horizon_favicon_net::ConnectionFactory;
use parking_lot::Mutex;

use crate::error::{FaviconError, Result};
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;
use crate::supplier::FaviconSupplier;

pub use builder::FaviconSupportBuilder;
pub use icon::FaviconIcon;
pub use report::{AttemptOutcome, ErrorObserver, FetchReport, MessageObserver, UpdateObserver};

/// Supplier name passed to the error observer for failures outside any
/// supplier.
pub const RESOLUTION_STAGE: &str = "resolution";

/// The cache entry for one ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// A resolution is scheduled or running.
    Pending,
    /// Resolution finished. `None` means no supplier had a favicon; that
    /// answer is kept for the life of the cache.
    Resolved(Option<FaviconImage>),
}

impl CacheState {
    /// Returns `true` while resolution is in flight.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, CacheState::Pending)
    }

    /// The resolved image, if any.
    #[inline]
    pub fn image(&self) -> Option<&FaviconImage> {
        match self {
            CacheState::Resolved(Some(image)) => Some(image),
            _ => None,
        }
    }
}

pub(crate) struct SupportInner {
    suppliers: Vec<Arc<dyn FaviconSupplier>>,
    connections: Arc<dyn ConnectionFactory>,
    executor: Arc<dyn Executor>,
    dispatcher: Arc<dyn Dispatcher>,
    ignore_parent_domain: bool,
    cache: Mutex<HashMap<FaviconRef, CacheState>>,
    on_message: MessageObserver,
    on_error: ErrorObserver,
    on_update: UpdateObserver,
}

/// Asynchronous favicon cache for UI code.
///
/// Cheap to clone; clones share one cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_favicon::{FaviconImage, FaviconRef, FaviconSupport};
/// use horizon_favicon_core::InvocationQueue;
/// use horizon_favicon_net::{CannedResponse, MemoryConnectionFactory};
///
/// let background = Arc::new(InvocationQueue::new());
/// let ui = Arc::new(InvocationQueue::new());
/// let connections = MemoryConnectionFactory::new();
/// connections.fallback(CannedResponse::status(404));
///
/// let support = FaviconSupport::builder()
///     .executor(background.clone())
///     .dispatcher(ui.clone())
///     .connection_factory(connections)
///     .build()?;
///
/// let favicon = FaviconRef::parse("example.com", 16)?;
/// let fallback = FaviconImage::solid(16, [128, 128, 128, 255]);
///
/// // First lookup returns the fallback and schedules a fetch.
/// assert_eq!(support.get_or_default(&favicon, &fallback), fallback);
///
/// background.process_until_idle();
/// ui.process_until_idle();
///
/// // Every supplier said 404: the fallback stays, and nothing is refetched.
/// assert_eq!(support.get_or_default(&favicon, &fallback), fallback);
/// assert_eq!(background.pending_count(), 0);
/// # Ok::<(), horizon_favicon::FaviconError>(())
/// ```
#[derive(Clone)]
pub struct FaviconSupport {
    inner: Arc<SupportInner>,
}

impl FaviconSupport {
    /// A support with the built-in suppliers, the shared thread pool, a
    /// dedicated dispatch thread and an HTTP connection factory.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a support.
    pub fn builder() -> FaviconSupportBuilder {
        FaviconSupportBuilder::new()
    }

    pub(crate) fn from_inner(inner: SupportInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The cached image for `favicon`, or `fallback`.
    ///
    /// Never blocks. The first lookup of a ref marks it pending and schedules
    /// its resolution; lookups while it is pending schedule nothing more.
    pub fn get_or_default(&self, favicon: &FaviconRef, fallback: &FaviconImage) -> FaviconImage {
        {
            let mut cache = self.inner.cache.lock();
            match cache.get(favicon) {
                Some(CacheState::Resolved(Some(image))) => return image.clone(),
                Some(CacheState::Resolved(None)) | Some(CacheState::Pending) => {
                    return fallback.clone();
                }
                None => {
                    cache.insert(favicon.clone(), CacheState::Pending);
                }
            }
        }

        // The lock is released: an inline executor may complete right here.
        self.schedule(favicon.clone());
        fallback.clone()
    }

    /// A lazy handle that looks `favicon` up only when rendered.
    pub fn icon(&self, favicon: FaviconRef, fallback: FaviconImage) -> FaviconIcon {
        FaviconIcon::new(self.clone(), favicon, fallback)
    }

    /// The cache entry for `favicon`, without scheduling anything.
    pub fn state(&self, favicon: &FaviconRef) -> Option<CacheState> {
        self.inner.cache.lock().get(favicon).cloned()
    }

    /// Number of resolved entries, with or without an image.
    pub fn cached_len(&self) -> usize {
        self.inner
            .cache
            .lock()
            .values()
            .filter(|state| !state.is_pending())
            .count()
    }

    /// Number of refs still being resolved.
    pub fn pending_len(&self) -> usize {
        self.inner
            .cache
            .lock()
            .values()
            .filter(|state| state.is_pending())
            .count()
    }

    /// The suppliers in the order they are tried.
    pub fn suppliers(&self) -> &[Arc<dyn FaviconSupplier>] {
        &self.inner.suppliers
    }

    /// Returns `true` if parent domains are never tried.
    pub fn ignores_parent_domain(&self) -> bool {
        self.inner.ignore_parent_domain
    }

    fn schedule(&self, favicon: FaviconRef) {
        tracing::debug!(target: targets::SUPPORT, favicon = %favicon, "scheduling favicon resolution");

        let mut completion = Completion::new(Arc::downgrade(&self.inner), favicon);
        self.inner.executor.execute(Box::new(move || {
            let Some(inner) = completion.support.upgrade() else {
                return;
            };
            let favicon = completion.favicon.clone();
            completion.image = panic::catch_unwind(AssertUnwindSafe(|| inner.resolve(&favicon)))
                .unwrap_or_else(|payload| {
                    let error = FaviconError::ResolutionPanicked(panic_message(payload.as_ref()));
                    (inner.on_error)(&favicon, RESOLUTION_STAGE, &error);
                    None
                });

            inner
                .dispatcher
                .dispatch(Box::new(move || completion.deliver()));
        }));
    }
}

impl SupportInner {
    /// Runs on the executor. Never touches the cache.
    fn resolve(&self, requested: &FaviconRef) -> Option<FaviconImage> {
        let span = tracing::debug_span!(
            target: targets::SUPPORT,
            "resolve_favicon",
            favicon = %requested
        );
        let _guard = span.enter();
        let started = Instant::now();

        let mut attempt = Some(requested.clone());
        while let Some(current) = attempt.take() {
            if let Some(image) = self.try_suppliers(requested, &current) {
                let image = image.resized(requested.size());
                tracing::debug!(
                    target: targets::SUPPORT,
                    from = %current,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "favicon found"
                );
                return Some(image);
            }
            if self.ignore_parent_domain {
                break;
            }
            attempt = current.parent();
        }

        tracing::debug!(
            target: targets::SUPPORT,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "no supplier had a favicon"
        );
        None
    }

    fn try_suppliers(&self, requested: &FaviconRef, attempted: &FaviconRef) -> Option<FaviconImage> {
        for supplier in &self.suppliers {
            let started = Instant::now();
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                supplier.fetch(attempted, self.connections.as_ref())
            }))
            .unwrap_or_else(|payload| {
                Err(FaviconError::SupplierPanicked(panic_message(payload.as_ref())))
            });

            let outcome = match &result {
                Ok(Some(image)) => AttemptOutcome::Found {
                    width: image.width(),
                    height: image.height(),
                },
                Ok(None) => AttemptOutcome::NoFavicon,
                Err(error) => {
                    (self.on_error)(attempted, supplier.name(), error);
                    AttemptOutcome::Failed(error.to_string())
                }
            };

            (self.on_message)(&FetchReport {
                requested: requested.clone(),
                attempted: attempted.clone(),
                supplier: supplier.name().to_string(),
                elapsed: started.elapsed(),
                outcome,
            });

            if let Ok(Some(image)) = result {
                return Some(image);
            }
        }
        None
    }

    /// Clears a pending mark whose resolution will never be delivered.
    fn abandon(&self, favicon: &FaviconRef) {
        let mut cache = self.cache.lock();
        if cache.get(favicon).is_some_and(CacheState::is_pending) {
            cache.remove(favicon);
            tracing::warn!(
                target: targets::SUPPORT,
                favicon = %favicon,
                "favicon resolution dropped before completion; will retry on next lookup"
            );
        }
    }

    /// Runs on the dispatcher.
    fn complete(&self, favicon: FaviconRef, image: Option<FaviconImage>) {
        tracing::trace!(
            target: targets::SUPPORT,
            favicon = %favicon,
            found = image.is_some(),
            "storing favicon"
        );
        self.cache
            .lock()
            .insert(favicon.clone(), CacheState::Resolved(image));
        (self.on_update)(&favicon);
    }
}

/// The result of one resolution on its way to the cache.
///
/// Travels from the executor task into the dispatched closure. Dropping it
/// undelivered, because a task was discarded or unwound, clears the pending
/// mark instead of leaving the ref stuck.
struct Completion {
    support: Weak<SupportInner>,
    favicon: FaviconRef,
    image: Option<FaviconImage>,
    delivered: bool,
}

impl Completion {
    fn new(support: Weak<SupportInner>, favicon: FaviconRef) -> Self {
        Self {
            support,
            favicon,
            image: None,
            delivered: false,
        }
    }

    fn deliver(mut self) {
        self.delivered = true;
        if let Some(inner) = self.support.upgrade() {
            inner.complete(self.favicon.clone(), self.image.take());
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.delivered {
            return;
        }
        if let Some(inner) = self.support.upgrade() {
            inner.abandon(&self.favicon);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for FaviconSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaviconSupport")
            .field("suppliers", &self.inner.suppliers)
            .field("ignore_parent_domain", &self.inner.ignore_parent_domain)
            .field("cached", &self.cached_len())
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload = panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 7");

        let payload = panic::catch_unwind(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_cache_state_accessors() {
        let image = FaviconImage::solid(1, [1, 2, 3, 4]);
        assert!(CacheState::Pending.is_pending());
        assert!(CacheState::Pending.image().is_none());
        assert!(CacheState::Resolved(None).image().is_none());
        assert_eq!(CacheState::Resolved(Some(image.clone())).image(), Some(&image));
    }
}
