use super::{CacheState, FaviconSupport};
use crate::favicon_image::FaviconImage;
use crate::favicon_ref::FaviconRef;

/// A favicon handle for widgets that paint icons.
///
/// Creating the handle and reading its size or fallback never touches the
/// network, so layout code can hold many of them for free. Only
/// [`current`](Self::current), called when the icon is actually painted,
/// looks the ref up and schedules a fetch on a miss.
#[derive(Clone, Debug)]
pub struct FaviconIcon {
    support: FaviconSupport,
    favicon: FaviconRef,
    fallback: FaviconImage,
}

impl FaviconIcon {
    pub(crate) fn new(support: FaviconSupport, favicon: FaviconRef, fallback: FaviconImage) -> Self {
        Self {
            support,
            favicon,
            fallback,
        }
    }

    /// The ref this icon shows.
    pub fn favicon_ref(&self) -> &FaviconRef {
        &self.favicon
    }

    /// Icon edge length in pixels.
    pub fn size(&self) -> u32 {
        self.favicon.size()
    }

    /// The image shown until the favicon is available.
    pub fn fallback(&self) -> &FaviconImage {
        &self.fallback
    }

    /// Returns `true` once the ref has resolved, with or without an image.
    pub fn is_resolved(&self) -> bool {
        matches!(self.support.state(&self.favicon), Some(CacheState::Resolved(_)))
    }

    /// The image to paint now.
    pub fn current(&self) -> FaviconImage {
        self.support.get_or_default(&self.favicon, &self.fallback)
    }
}
