use horizon_favicon_net::ConnectionFactory;
use url::Url;

use super::{FaviconSupplier, fetch_image, has_media_type};
use crate::error::Result;
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

/// The icon.horse favicon service.
///
/// For unknown domains it generates a letter placeholder served as SVG;
/// that content type is treated as a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconHorseSupplier;

impl IconHorseSupplier {
    /// The named size class for a pixel size.
    fn size_class(size: u32) -> &'static str {
        match size {
            0..=32 => "small",
            33..=64 => "medium",
            _ => "large",
        }
    }

    /// The request URL for `favicon`.
    pub fn url_for(favicon: &FaviconRef) -> Result<Url> {
        let mut url = Url::parse(&format!("https://icon.horse/icon/{}", favicon.domain()))?;
        url.query_pairs_mut()
            .append_pair("size", Self::size_class(favicon.size()));
        Ok(url)
    }
}

impl FaviconSupplier for IconHorseSupplier {
    fn name(&self) -> &str {
        "icon.horse"
    }

    fn rank(&self) -> i32 {
        60
    }

    fn fetch(
        &self,
        favicon: &FaviconRef,
        connections: &dyn ConnectionFactory,
    ) -> Result<Option<FaviconImage>> {
        let url = Self::url_for(favicon)?;
        fetch_image(self.name(), connections, &url, |connection| {
            connection.status() == 404 || has_media_type(connection, "image/svg+xml")
        })
    }
}
