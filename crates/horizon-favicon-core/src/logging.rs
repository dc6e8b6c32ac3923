//! Logging facilities for Horizon Favicon.
//!
//! Horizon Favicon uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_favicon=debug")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Orchestrator and cache.
    pub const SUPPORT: &str = "horizon_favicon::support";
    /// Supplier plugins.
    pub const SUPPLIER: &str = "horizon_favicon::supplier";
    /// HTTP connections.
    pub const NET: &str = "horizon_favicon::net";
    /// UI-thread dispatch.
    pub const DISPATCH: &str = "horizon_favicon::dispatch";
    /// Background thread pool.
    pub const POOL: &str = "horizon_favicon::pool";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::SUPPORT,
            targets::SUPPLIER,
            targets::NET,
            targets::DISPATCH,
            targets::POOL,
        ] {
            assert!(target.starts_with("horizon_favicon::"));
        }
    }
}
