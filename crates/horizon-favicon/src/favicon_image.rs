//! Decoded favicon bitmaps.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::Result;

/// Largest edge [`FaviconImage::resized`] will produce. No provider serves
/// icons beyond this, and larger targets would only allocate upscaled blur.
pub const MAX_ICON_SIZE: u32 = 256;

/// An immutable RGBA bitmap.
///
/// Clones share the pixel buffer, so handing the same favicon to many
/// widgets is cheap. Equality compares dimensions and pixels.
#[derive(Clone)]
pub struct FaviconImage {
    inner: Arc<RgbaImage>,
}

impl FaviconImage {
    /// Wrap a decoded RGBA buffer.
    pub fn new(image: RgbaImage) -> Self {
        Self {
            inner: Arc::new(image),
        }
    }

    /// Build an image from raw RGBA bytes in row-major order.
    ///
    /// Returns `None` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    /// A square image filled with one color.
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(size, size, Rgba(rgba)))
    }

    /// Decode PNG, ICO, GIF, JPEG or any other format the `image` crate
    /// recognizes from its magic bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Raw RGBA bytes in row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// Borrow the underlying buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.inner
    }

    /// Scale to a `size` x `size` square with Lanczos3 resampling.
    ///
    /// `size` is clamped to [`MAX_ICON_SIZE`]. Returns a clone sharing this
    /// buffer when the image is already the target size, or when `size` is
    /// zero.
    pub fn resized(&self, size: u32) -> FaviconImage {
        let size = size.min(MAX_ICON_SIZE);
        if size == 0 || (self.width() == size && self.height() == size) {
            return self.clone();
        }
        Self::new(image::imageops::resize(
            &*self.inner,
            size,
            size,
            FilterType::Lanczos3,
        ))
    }

    /// Returns `true` if every pixel is fully transparent.
    ///
    /// Some providers answer "no favicon" with such an image.
    pub fn is_blank(&self) -> bool {
        self.inner.pixels().all(|pixel| pixel.0[3] == 0)
    }

    /// Returns `true` if both images share one pixel buffer.
    pub fn same_instance(&self, other: &FaviconImage) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.inner.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

impl PartialEq for FaviconImage {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
            || (self.width() == other.width()
                && self.height() == other.height()
                && self.pixels() == other.pixels())
    }
}

impl Eq for FaviconImage {}

impl fmt::Debug for FaviconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaviconImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
