//! Error types for paracate-core.

use thiserror::Error;

/// Errors from the host item API.
#[derive(Debug, Error)]
pub enum HostError {
    /// An item read or persist call failed inside the host.
    #[error("Item API error: {0}")]
    Api(String),
}

/// Errors from the category store.
///
/// Expected, recoverable outcomes (duplicate create, rename collision,
/// unknown name or item) are reported as `Ok(false)` by the operations
/// themselves, never through these variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Name failed the character/length predicate.
    #[error("Invalid category name: {0}")]
    Validation(String),

    /// The backing store itself failed (I/O, connection, lock).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The host item API failed.
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}
