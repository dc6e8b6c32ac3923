//! Error types for Horizon Favicon core.

use thiserror::Error;

/// Errors raised while setting up execution resources.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The rayon thread pool could not be built.
    #[error("failed to create thread pool: {0}")]
    ThreadPoolCreation(String),

    /// A dedicated thread could not be spawned.
    #[error("failed to spawn thread '{name}': {source}")]
    ThreadSpawn {
        /// Name of the thread that failed to start.
        name: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
