//! paracate-core: category persistence and item tagging for a reference manager.
//!
//! Categories are user-defined labels managed independently of the host's
//! tag vocabulary; assigning one to a library item materializes it as a tag
//! on that item. This crate owns the durable category set and the bridge to
//! the host's item API, and nothing else; it never touches a document or
//! window object.

pub mod backend;
pub mod category;
pub mod error;
pub mod event;
pub mod host;
pub mod prefs;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use backend::*;
pub use category::*;
pub use error::*;
pub use event::*;
pub use host::*;
pub use prefs::*;
pub use store::*;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;
