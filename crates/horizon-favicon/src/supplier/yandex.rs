use horizon_favicon_net::ConnectionFactory;
use url::Url;

use super::{FaviconSupplier, bucket, fetch_image};
use crate::error::Result;
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

const SIZES: [u32; 4] = [16, 32, 64, 120];

/// Yandex's favicon service.
///
/// Unknown domains get either a 204 or a single transparent pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct YandexSupplier;

impl YandexSupplier {
    /// The request URL for `favicon`.
    pub fn url_for(favicon: &FaviconRef) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "https://favicon.yandex.net/favicon/v2/{}",
            favicon.domain()
        ))?;
        url.query_pairs_mut()
            .append_pair("size", &bucket(favicon.size(), &SIZES).to_string());
        Ok(url)
    }

    fn is_placeholder(image: &FaviconImage) -> bool {
        image.width() == 1 && image.height() == 1 && image.is_blank()
    }
}

impl FaviconSupplier for YandexSupplier {
    fn name(&self) -> &str {
        "yandex"
    }

    fn rank(&self) -> i32 {
        40
    }

    fn fetch(
        &self,
        favicon: &FaviconRef,
        connections: &dyn ConnectionFactory,
    ) -> Result<Option<FaviconImage>> {
        let url = Self::url_for(favicon)?;
        let image = fetch_image(self.name(), connections, &url, |connection| {
            connection.status() == 204
        })?;
        Ok(image.filter(|image| !Self::is_placeholder(image)))
    }
}
