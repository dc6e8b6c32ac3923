use horizon_favicon_net::ConnectionFactory;
use url::Url;

use super::{FaviconSupplier, bucket, fetch_image};
use crate::error::Result;
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

const SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// Google's S2 favicon service.
///
/// Google answers unknown domains with its globe placeholder and a 404, so
/// the status alone marks a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleSupplier;

impl GoogleSupplier {
    /// The request URL for `favicon`.
    pub fn url_for(favicon: &FaviconRef) -> Result<Url> {
        let size = bucket(favicon.size(), &SIZES).to_string();
        let domain = favicon.domain().to_string();
        Ok(Url::parse_with_params(
            "https://www.google.com/s2/favicons",
            [("domain", domain.as_str()), ("sz", size.as_str())],
        )?)
    }
}

impl FaviconSupplier for GoogleSupplier {
    fn name(&self) -> &str {
        "google"
    }

    fn rank(&self) -> i32 {
        100
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
