//! The `(domain, size)` key of a favicon request.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::domain::DomainName;
use crate::error::{FaviconError, Result};

struct RefInner {
    domain: DomainName,
    size: u32,
}

/// A request for the favicon of a domain at a logical pixel size.
///
/// Cheap to clone: clones share one allocation, which is what
/// [`FaviconRef::same_instance`] compares. Equality and hashing use the
/// `(domain, size)` pair, so a ref can key the favicon cache.
#[derive(Clone)]
pub struct FaviconRef {
    inner: Arc<RefInner>,
}

impl FaviconRef {
    /// Pair a domain with a size. The size is not validated here.
    pub fn of(domain: DomainName, size: u32) -> Self {
        Self {
            inner: Arc::new(RefInner { domain, size }),
        }
    }

    /// Parse `domain` and pair it with `size`.
    pub fn parse(domain: &str, size: u32) -> Result<Self> {
        Ok(Self::of(DomainName::parse(domain)?, size))
    }

    /// The requested domain.
    pub fn domain(&self) -> &DomainName {
        &self.inner.domain
    }

    /// The requested size in logical pixels.
    pub fn size(&self) -> u32 {
        self.inner.size
    }

    /// The same size for the parent domain, if the domain has one.
    pub fn parent(&self) -> Option<FaviconRef> {
        self.inner
            .domain
            .parent()
            .map(|domain| Self::of(domain, self.inner.size))
    }

    /// Multiply the size by `factor`, rounding to the nearest pixel.
    ///
    /// A factor of exactly `1.0` returns this very instance. Non-positive
    /// and NaN factors are rejected, as are products that overflow `u32`.
    /// Tiny positive factors clamp to one pixel, so a scaled ref never has
    /// size zero.
    pub fn scale(&self, factor: f64) -> Result<FaviconRef> {
        if factor.is_nan() || factor <= 0.0 {
            return Err(FaviconError::InvalidArgument(format!(
                "scale factor must be positive, got {factor}"
            )));
        }
        if factor == 1.0 {
            return Ok(self.clone());
        }
        let scaled = (f64::from(self.inner.size) * factor).round().max(1.0);
        if scaled > f64::from(u32::MAX) {
            return Err(FaviconError::InvalidArgument(format!(
                "scaling {self} by {factor} overflows the pixel size"
            )));
        }
        Ok(Self::of(self.inner.domain.clone(), scaled as u32))
    }

    /// Returns `true` if both refs share one allocation.
    pub fn same_instance(&self, other: &FaviconRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for FaviconRef {
    fn eq(&self, other: &Self) -> bool {
        self.inner.size == other.inner.size && self.inner.domain == other.inner.domain
    }
}

impl Eq for FaviconRef {}

impl Hash for FaviconRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.domain.hash(state);
        self.inner.size.hash(state);
    }
}

impl fmt::Debug for FaviconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaviconRef")
            .field("domain", &self.inner.domain.to_string())
            .field("size", &self.inner.size)
            .finish()
    }
}

impl fmt::Display for FaviconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.inner.domain, self.inner.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn favicon_ref(domain: &str, size: u32) -> FaviconRef {
        FaviconRef::parse(domain, size).unwrap()
    }

    #[test]
    fn test_scale_one_is_identity() {
        let original = favicon_ref("example.com", 16);
        let scaled = original.scale(1.0).unwrap();
        assert!(scaled.same_instance(&original));
    }

    #[test]
    fn test_scale_rounds() {
        let original = favicon_ref("example.com", 16);

        let doubled = original.scale(2.0).unwrap();
        assert_eq!(doubled.size(), 32);
        assert_eq!(doubled.domain(), original.domain());
        assert!(!doubled.same_instance(&original));

        assert_eq!(original.scale(1.25).unwrap().size(), 20);
        assert_eq!(original.scale(1.5).unwrap().size(), 24);
        assert_eq!(favicon_ref("example.com", 15).scale(1.1).unwrap().size(), 17);
    }

    #[test]
    fn test_scale_rejects_non_positive() {
        let original = favicon_ref("example.com", 16);
        for factor in [0.0, -1.0, -0.5, f64::NAN] {
            assert!(matches!(
                original.scale(factor),
                Err(FaviconError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_scale_never_reaches_zero() {
        let original = favicon_ref("example.com", 16);
        assert_eq!(original.scale(0.01).unwrap().size(), 1);
        assert_eq!(original.scale(f64::MIN_POSITIVE).unwrap().size(), 1);
    }

    #[test]
    fn test_scale_rejects_overflow() {
        let original = favicon_ref("example.com", 16);
        for factor in [1e9, f64::INFINITY] {
            assert!(matches!(
                original.scale(factor),
                Err(FaviconError::InvalidArgument(_))
            ));
        }
        assert_eq!(original.scale(1e6).unwrap().size(), 16_000_000);
    }

    #[test]
    fn test_parent_keeps_size() {
        let child = favicon_ref("www.example.com", 32);
        let parent = child.parent().unwrap();
        assert_eq!(parent.domain().to_string(), "example.com");
        assert_eq!(parent.size(), 32);
        assert!(parent.parent().is_none());
    }

    #[test]
    fn test_value_equality_and_hash() {
        let a = favicon_ref("example.com", 16);
        let b = favicon_ref("example.com", 16);
        let c = favicon_ref("example.com", 32);
        assert_eq!(a, b);
        assert!(!a.same_instance(&b));
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_size_not_validated_at_construction() {
        let zero = FaviconRef::of(DomainName::parse("example.com").unwrap(), 0);
        assert_eq!(zero.size(), 0);
        assert_eq!(zero.to_string(), "example.com@0");
    }
}
