//! Favicon suppliers.
//!
//! A supplier knows one way of turning a [`FaviconRef`] into an image: a
//! public favicon service, or the site's own `/favicon.ico`. Suppliers are
//! stateless and never open sockets themselves; every request goes through
//! the [`ConnectionFactory`] handed to [`FaviconSupplier::fetch`].
//!
//! [`default_suppliers`] returns the built-in registry, highest rank first.
//! Hosts add their own by implementing [`FaviconSupplier`] and passing it to
//! [`FaviconSupportBuilder::supplier`](crate::FaviconSupportBuilder::supplier).

mod direct;
mod duckduckgo;
mod google;
mod icon_horse;
mod yandex;

use std::cmp::Reverse;
use std::sync::Arc;

use horizon_favicon_core::logging::targets;
use horizon_favicon_net::{Connection, ConnectionFactory};
use url::Url;

use crate::error::{FaviconError, Result};
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

pub use direct::DirectSupplier;
pub use duckduckgo::DuckDuckGoSupplier;
pub use google::GoogleSupplier;
pub use icon_horse::IconHorseSupplier;
pub use yandex::YandexSupplier;

/// A strategy for fetching the favicon of one [`FaviconRef`].
///
/// Implementations are shared across background threads and must not keep
/// per-request state.
pub trait FaviconSupplier: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Ordering key. Suppliers with a higher rank are tried first.
    fn rank(&self) -> i32;

    /// Fetch the favicon.
    ///
    /// Returns `Ok(None)` when the source positively reports that it has no
    /// favicon for the domain. Transport failures, unexpected statuses and
    /// undecodable bodies are errors.
    fn fetch(
        &self,
        favicon: &FaviconRef,
        connections: &dyn ConnectionFactory,
    ) -> Result<Option<FaviconImage>>;
}

impl std::fmt::Debug for dyn FaviconSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaviconSupplier")
            .field("name", &self.name())
            .field("rank", &self.rank())
            .finish()
    }
}

/// The built-in suppliers, highest rank first.
pub fn default_suppliers() -> Vec<Arc<dyn FaviconSupplier>> {
    let mut suppliers: Vec<Arc<dyn FaviconSupplier>> = vec![
        Arc::new(GoogleSupplier),
        Arc::new(DuckDuckGoSupplier),
        Arc::new(IconHorseSupplier),
        Arc::new(YandexSupplier),
        Arc::new(DirectSupplier),
    ];
    sort_by_rank(&mut suppliers);
    suppliers
}

/// Sort by rank, highest first. Equal ranks keep their relative order.
pub fn sort_by_rank(suppliers: &mut [Arc<dyn FaviconSupplier>]) {
    suppliers.sort_by_key(|supplier| Reverse(supplier.rank()));
}

/// Round `size` up to the nearest supported bucket, capping at the largest.
///
/// `buckets` must be sorted ascending and non-empty.
pub(crate) fn bucket(size: u32, buckets: &[u32]) -> u32 {
    buckets
        .iter()
        .copied()
        .find(|&bucket| bucket >= size)
        .or_else(|| buckets.last().copied())
        .unwrap_or(size)
}

/// The media type of a `Content-Type` value, without parameters.
pub(crate) fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// Returns `true` if the connection's media type is `expected`.
pub(crate) fn has_media_type(connection: &dyn Connection, expected: &str) -> bool {
    connection
        .content_type()
        .is_some_and(|content_type| media_type(content_type).eq_ignore_ascii_case(expected))
}

/// Open `url`, classify the response and decode the body.
///
/// `is_missing` sees the response before its body is read and decides
/// whether it is the provider's "no favicon" answer. Anything else that is
/// not a 2xx becomes [`FaviconError::UnexpectedStatus`]. The connection is
/// dropped, and so released, on every path out of this function.
pub(crate) fn fetch_image(
    supplier: &str,
    connections: &dyn ConnectionFactory,
    url: &Url,
    is_missing: impl FnOnce(&dyn Connection) -> bool,
) -> Result<Option<FaviconImage>> {
    let mut connection = connections.open(url)?;
    let status = connection.status();

    if is_missing(&*connection) {
        tracing::trace!(
            target: targets::SUPPLIER,
            supplier,
            url = %url,
            status,
            "provider reports no favicon"
        );
        return Ok(None);
    }

    if !connection.is_success() {
        return Err(FaviconError::UnexpectedStatus {
            status,
            url: connection.url().to_string(),
        });
    }

    let body = connection.read_body()?;
    let image = FaviconImage::decode(&body)?;
    tracing::trace!(
        target: targets::SUPPLIER,
        supplier,
        url = %url,
        width = image.width(),
        height = image.height(),
        "decoded favicon"
    );
    Ok(Some(image))
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Ranked(&'static str, i32);

    impl FaviconSupplier for Ranked {
        fn name(&self) -> &str {
            self.0
        }

        fn rank(&self) -> i32 {
            self.1
        }

        fn fetch(&self, _: &FaviconRef, _: &dyn ConnectionFactory) -> Result<Option<FaviconImage>> {
            Ok(None)
        }
    }

    #[test]
    fn test_default_suppliers_ranked() {
        let suppliers = default_suppliers();
        let names: Vec<&str> = suppliers.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["google", "duckduckgo", "icon.horse", "yandex", "direct"]);

        let ranks: Vec<i32> = suppliers.iter().map(|s| s.rank()).collect();
        assert!(ranks.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_sort_by_rank_is_stable() {
        let mut suppliers: Vec<Arc<dyn FaviconSupplier>> = vec![
            Arc::new(Ranked("low", 1)),
            Arc::new(Ranked("first-tie", 5)),
            Arc::new(Ranked("high", 9)),
            Arc::new(Ranked("second-tie", 5)),
        ];
        sort_by_rank(&mut suppliers);
        let names: Vec<&str> = suppliers.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["high", "first-tie", "second-tie", "low"]);
    }

    #[test]
    fn test_bucket() {
        let buckets = [16, 32, 64];
        assert_eq!(bucket(0, &buckets), 16);
        assert_eq!(bucket(16, &buckets), 16);
        assert_eq!(bucket(17, &buckets), 32);
        assert_eq!(bucket(64, &buckets), 64);
        assert_eq!(bucket(500, &buckets), 64);
    }

    #[test]
    fn test_media_type() {
        assert_eq!(media_type("text/html; charset=utf-8"), "text/html");
        assert_eq!(media_type(" image/png "), "image/png");
        assert_eq!(media_type(""), "");
    }
}
