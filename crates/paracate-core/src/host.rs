//! The host item API seam.
//!
//! Items belong to the host library; the store only reads and rewrites
//! their tag sets through this trait. Implementations are injected at
//! construction; category logic never touches host globals.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::HostError;

/// Host-assigned item identifier.
pub type ItemId = i64;

/// Narrow view of the host's item and tag API.
pub trait ItemHost: Send + Sync {
    /// The item's current tag set, or `None` when `id` resolves to nothing.
    fn tags(&self, id: ItemId) -> Result<Option<Vec<String>>, HostError>;

    /// Replace the item's tag set and persist the item durably.
    fn set_tags(&self, id: ItemId, tags: Vec<String>) -> Result<(), HostError>;

    /// Ids of all items carrying the given tag.
    fn find_by_tag(&self, tag: &str) -> Result<Vec<ItemId>, HostError>;
}

/// In-memory host library (for testing).
#[derive(Debug, Default)]
pub struct MemoryHost {
    items: Mutex<BTreeMap<ItemId, Vec<String>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item with the given starting tags.
    pub fn add_item(&self, id: ItemId, tags: &[&str]) {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(id, tags.iter().map(|t| (*t).to_string()).collect());
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ItemId, Vec<String>>>, HostError> {
        self.items
            .lock()
            .map_err(|e| HostError::Api(format!("items lock: {}", e)))
    }
}

impl ItemHost for MemoryHost {
    fn tags(&self, id: ItemId) -> Result<Option<Vec<String>>, HostError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn set_tags(&self, id: ItemId, tags: Vec<String>) -> Result<(), HostError> {
        let mut items = self.lock()?;
        match items.get_mut(&id) {
            Some(slot) => {
                *slot = tags;
                Ok(())
            }
            None => Err(HostError::Api(format!("unknown item {}", id))),
        }
    }

    fn find_by_tag(&self, tag: &str) -> Result<Vec<ItemId>, HostError> {
        let items = self.lock()?;
        Ok(items
            .iter()
            .filter(|(_, tags)| tags.iter().any(|t| t == tag))
            .map(|(id, _)| *id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_item_resolves_to_none() {
        let host = MemoryHost::new();
        assert!(host.tags(7).unwrap().is_none());
    }

    #[test]
    fn set_tags_replaces_and_persists() {
        let host = MemoryHost::new();
        host.add_item(7, &["old"]);
        host.set_tags(7, vec!["new".into()]).unwrap();
        assert_eq!(host.tags(7).unwrap().unwrap(), vec!["new"]);
    }

    #[test]
    fn find_by_tag_matches_exactly() {
        let host = MemoryHost::new();
        host.add_item(1, &["Fieldwork"]);
        host.add_item(2, &["Fieldwork", "Archive"]);
        host.add_item(3, &["fieldwork"]);
        assert_eq!(host.find_by_tag("Fieldwork").unwrap(), vec![1, 2]);
    }
}
