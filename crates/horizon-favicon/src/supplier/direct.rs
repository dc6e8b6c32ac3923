use horizon_favicon_net::ConnectionFactory;
use url::Url;

use super::{FaviconSupplier, fetch_image, has_media_type};
use crate::error::Result;
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

/// Fetches `/favicon.ico` from the site itself. Last resort.
///
/// Many sites answer missing files with an HTML error page and a 200, so an
/// HTML content type counts as a miss too.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSupplier;

impl DirectSupplier {
    /// The request URL for `favicon`.
    pub fn url_for(favicon: &FaviconRef) -> Result<Url> {
        Ok(Url::parse(&format!("https://{}/favicon.ico", favicon.domain()))?)
    }
}

impl FaviconSupplier for DirectSupplier {
    fn name(&self) -> &str {
        "direct"
    }

    fn rank(&self) -> i32 {
        0
    }

    fn fetch(
        &self,
        favicon: &FaviconRef,
        connections: &dyn ConnectionFactory,
    ) -> Result<Option<FaviconImage>> {
        let url = Self::url_for(favicon)?;
        fetch_image(self.name(), connections, &url, |connection| {
            matches!(connection.status(), 404 | 410) || has_media_type(connection, "text/html")
        })
    }
}
