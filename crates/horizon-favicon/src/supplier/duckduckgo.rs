use horizon_favicon_net::ConnectionFactory;
use url::Url;

use super::{FaviconSupplier, fetch_image};
use crate::error::Result;
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

/// DuckDuckGo's icon proxy. Serves the site's `.ico` at its native size.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoSupplier;

impl DuckDuckGoSupplier {
    /// The request URL for `favicon`.
    pub fn url_for(favicon: &FaviconRef) -> Result<Url> {
        Ok(Url::parse(&format!(
            "https://icons.duckduckgo.com/ip3/{}.ico",
            favicon.domain()
        ))?)
    }
}

impl FaviconSupplier for DuckDuckGoSupplier {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn rank(&self) -> i32 {
        80
    }

    fn fetch(
        &self,
        favicon: &FaviconRef,
        connections: &dyn ConnectionFactory,
    ) -> Result<Option<FaviconImage>> {
        let url = Self::url_for(favicon)?;
        fetch_image(self.name(), connections, &url, |connection| {
            connection.status() == 404
        })
    }
}
