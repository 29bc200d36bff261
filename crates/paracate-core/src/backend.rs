//! The persistence seam for the category set.

use crate::error::StoreError;

/// The trait both storage backends implement.
///
/// Infrastructure failure is the only error; duplicate and absent names are
/// reported through the boolean results. Implementations must guarantee
/// that no two equal names coexist, even under concurrent mutation: the
/// SQLite variant gets this from its `UNIQUE` column, and the preference
/// variant serializes every read-modify-write.
pub trait CategoryBackend: Send + Sync {
    /// Ensure the backing schema or seed value exists.
    ///
    /// Idempotent and reentrant; constructors call it, and calling it again
    /// never duplicates schema objects or clobbers stored names.
    fn initialize(&self) -> Result<(), StoreError>;

    /// Add a name. Returns `false` iff it was already present.
    fn insert(&self, name: &str) -> Result<bool, StoreError>;

    /// Remove a name. Returns `false` iff it was not present.
    fn remove(&self, name: &str) -> Result<bool, StoreError>;

    /// Atomically rename `old` to `new`.
    ///
    /// Returns `false`, leaving the set unchanged, if `old` is absent or
    /// `new` already exists.
    fn rename(&self, old: &str, new: &str) -> Result<bool, StoreError>;

    /// All names currently stored. Order carries no meaning.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Whether a name is currently stored.
    fn contains(&self, name: &str) -> Result<bool, StoreError>;
}
