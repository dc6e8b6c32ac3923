//! Diagnostics emitted while resolving favicons.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use horizon_favicon_core::logging::targets;

use crate::error::FaviconError;
use crate::favicon_ref::FaviconRef;

/// What one supplier attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The supplier returned an image of this size.
    Found {
        /// Width in pixels, before any resize.
        width: u32,
        /// Height in pixels, before any resize.
        height: u32,
    },
    /// The supplier reported that it has no favicon.
    NoFavicon,
    /// The supplier failed or panicked.
    Failed(String),
}

/// One supplier attempt, reported to the message observer.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// The ref the UI asked for.
    pub requested: FaviconRef,
    /// The ref actually tried; a parent of `requested` during fallback.
    pub attempted: FaviconRef,
    /// Name of the supplier.
    pub supplier: String,
    /// Wall time spent in the supplier.
    pub elapsed: Duration,
    /// What came back.
    pub outcome: AttemptOutcome,
}

impl fmt::Display for FetchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {} for {} in {}ms: ",
            self.attempted,
            self.supplier,
            self.requested,
            self.elapsed.as_millis()
        )?;
        match &self.outcome {
            AttemptOutcome::Found { width, height } => write!(f, "found {width}x{height}"),
            AttemptOutcome::NoFavicon => f.write_str("no favicon"),
            AttemptOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Receives a [`FetchReport`] after every supplier attempt.
pub type MessageObserver = Arc<dyn Fn(&FetchReport) + Send + Sync>;

/// Receives supplier failures: the attempted ref, the supplier name and
/// the error. Failures outside any supplier arrive with the name
/// [`RESOLUTION_STAGE`](super::RESOLUTION_STAGE).
pub type ErrorObserver = Arc<dyn Fn(&FaviconRef, &str, &FaviconError) + Send + Sync>;

/// Called on the dispatcher once a ref has resolved, so the host can
/// repaint whatever shows it.
pub type UpdateObserver = Arc<dyn Fn(&FaviconRef) + Send + Sync>;

pub(crate) fn log_message() -> MessageObserver {
    Arc::new(|report: &FetchReport| {
        tracing::debug!(target: targets::SUPPORT, "{report}");
    })
}

pub(crate) fn log_error() -> ErrorObserver {
    Arc::new(|favicon: &FaviconRef, supplier: &str, error: &FaviconError| {
        tracing::warn!(
            target: targets::SUPPORT,
            favicon = %favicon,
            supplier,
            error = %error,
            "favicon supplier failed"
        );
    })
}

pub(crate) fn log_update() -> UpdateObserver {
    Arc::new(|favicon: &FaviconRef| {
        tracing::trace!(target: targets::SUPPORT, favicon = %favicon, "favicon resolved");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let requested = FaviconRef::parse("a.example.com", 16).unwrap();
        let attempted = requested.parent().unwrap();
        let mut report = FetchReport {
            requested,
            attempted,
            supplier: "google".into(),
            elapsed: Duration::from_millis(42),
            outcome: AttemptOutcome::Found {
                width: 32,
                height: 32,
            },
        };
        assert_eq!(
            report.to_string(),
            "example.com@16 via google for a.example.com@16 in 42ms: found 32x32"
        );

        report.outcome = AttemptOutcome::Failed("timed out".into());
        assert!(report.to_string().ends_with("failed: timed out"));
    }
}
