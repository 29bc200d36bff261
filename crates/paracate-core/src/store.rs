//! The category store.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::backend::CategoryBackend;
use crate::category::validate_name;
use crate::error::StoreError;
use crate::event::CategoryEvent;
use crate::host::{ItemHost, ItemId};

/// What happens to tags already applied to items when their category is
/// deleted or renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CascadePolicy {
    /// Leave existing item tags untouched (the historical behavior).
    #[default]
    Orphan,
    /// Rewrite or remove the matching tag on every item carrying it.
    Cascade,
}

/// Owns the durable category set and bridges category assignment onto the
/// host's item tags.
///
/// Sole writer of persisted category state. Expected outcomes (duplicate,
/// not-found) come back as `Ok(false)`; only infrastructure failures are
/// errors, and those are logged before they propagate.
pub struct CategoryStore {
    backend: Box<dyn CategoryBackend>,
    host: Arc<dyn ItemHost>,
    policy: CascadePolicy,
    event_tx: Sender<CategoryEvent>,
    event_rx: Mutex<Option<Receiver<CategoryEvent>>>,
}

impl CategoryStore {
    /// Build a store over an initialized backend and the host item API,
    /// with the default [`CascadePolicy::Orphan`].
    pub fn new(backend: Box<dyn CategoryBackend>, host: Arc<dyn ItemHost>) -> Self {
        Self::with_policy(backend, host, CascadePolicy::default())
    }

    pub fn with_policy(
        backend: Box<dyn CategoryBackend>,
        host: Arc<dyn ItemHost>,
        policy: CascadePolicy,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            host,
            policy,
            event_tx: tx,
            event_rx: Mutex::new(Some(rx)),
        }
    }

    /// Subscribe to change events. Returns a channel of events.
    pub fn subscribe(&self) -> Result<Receiver<CategoryEvent>, StoreError> {
        let rx = self
            .event_rx
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .take()
            .ok_or_else(|| StoreError::Storage("subscribe: receiver already taken".to_string()))?;
        Ok(rx)
    }

    fn emit(&self, event: CategoryEvent) {
        // Ignore send errors (receiver may be dropped)
        let _ = self.event_tx.send(event);
    }

    /// Create a new category. `Ok(false)` when the name already exists.
    pub fn create_category(&self, name: &str) -> Result<bool, StoreError> {
        let name = validate_name(name)?;
        let added = self.backend.insert(&name).map_err(|e| {
            tracing::warn!("create_category {:?}: {}", name, e);
            e
        })?;
        if added {
            self.emit(CategoryEvent::Created(name));
        }
        Ok(added)
    }

    /// Delete a category. `Ok(false)` when the name was not present; a
    /// second delete of the same name is a no-op reporting `false`.
    ///
    /// Under [`CascadePolicy::Cascade`] the matching tag is also removed
    /// from every item carrying it; under [`CascadePolicy::Orphan`] item
    /// tags are left in place.
    pub fn delete_category(&self, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        let removed = self.backend.remove(name).map_err(|e| {
            tracing::warn!("delete_category {:?}: {}", name, e);
            e
        })?;
        if !removed {
            return Ok(false);
        }
        if self.policy == CascadePolicy::Cascade {
            self.untag_all(name).map_err(|e| {
                tracing::warn!("delete_category cascade {:?}: {}", name, e);
                e
            })?;
        }
        self.emit(CategoryEvent::Deleted(name.to_string()));
        Ok(true)
    }

    /// Rename a category. `Ok(false)`, with the set unchanged, when `old`
    /// is absent or `new` collides with an existing name.
    ///
    /// Same cascade behavior as [`CategoryStore::delete_category`]: the tag
    /// is rewritten on carrying items only under [`CascadePolicy::Cascade`].
    pub fn rename_category(&self, old: &str, new: &str) -> Result<bool, StoreError> {
        let old = old.trim();
        let new = validate_name(new)?;
        if old == new {
            return Ok(false);
        }
        let renamed = self.backend.rename(old, &new).map_err(|e| {
            tracing::warn!("rename_category {:?} -> {:?}: {}", old, new, e);
            e
        })?;
        if !renamed {
            return Ok(false);
        }
        if self.policy == CascadePolicy::Cascade {
            self.retag_all(old, &new).map_err(|e| {
                tracing::warn!("rename_category cascade {:?}: {}", old, e);
                e
            })?;
        }
        self.emit(CategoryEvent::Renamed {
            from: old.to_string(),
            to: new,
        });
        Ok(true)
    }

    /// The full category set.
    pub fn all_categories(&self) -> Result<Vec<String>, StoreError> {
        self.backend.list().map_err(|e| {
            tracing::warn!("all_categories: {}", e);
            e
        })
    }

    /// Assign a category to an item by tagging it.
    ///
    /// `Ok(false)` when the category does not exist (it is never
    /// auto-created) or when the item cannot be resolved. An already
    /// assigned category is a no-op `Ok(true)`; the item ends up with
    /// exactly one matching tag either way.
    pub fn assign_category(&self, item: ItemId, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        if !self.backend.contains(name).map_err(|e| {
            tracing::warn!("assign_category {:?}: {}", name, e);
            e
        })? {
            return Ok(false);
        }
        let mut tags = match self.item_tags(item)? {
            Some(tags) => tags,
            None => return Ok(false),
        };
        if tags.iter().any(|t| t == name) {
            return Ok(true);
        }
        tags.push(name.to_string());
        self.persist_tags(item, tags)?;
        self.emit(CategoryEvent::Assigned {
            item,
            name: name.to_string(),
        });
        Ok(true)
    }

    /// Remove a category tag from an item.
    ///
    /// `Ok(false)` only when the item cannot be resolved; removing a tag
    /// that is not present is a no-op `Ok(true)`.
    pub fn remove_category(&self, item: ItemId, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        let tags = match self.item_tags(item)? {
            Some(tags) => tags,
            None => return Ok(false),
        };
        let remaining: Vec<String> = tags.iter().filter(|t| t.as_str() != name).cloned().collect();
        if remaining.len() == tags.len() {
            return Ok(true);
        }
        self.persist_tags(item, remaining)?;
        self.emit(CategoryEvent::Unassigned {
            item,
            name: name.to_string(),
        });
        Ok(true)
    }

    /// Ids of all items currently carrying the category.
    ///
    /// Empty when the category does not exist, regardless of stray tags.
    pub fn items_with_category(&self, name: &str) -> Result<Vec<ItemId>, StoreError> {
        let name = name.trim();
        if !self.backend.contains(name).map_err(|e| {
            tracing::warn!("items_with_category {:?}: {}", name, e);
            e
        })? {
            return Ok(Vec::new());
        }
        self.host.find_by_tag(name).map_err(|e| {
            tracing::warn!("items_with_category {:?}: {}", name, e);
            StoreError::Host(e)
        })
    }

    fn item_tags(&self, item: ItemId) -> Result<Option<Vec<String>>, StoreError> {
        self.host.tags(item).map_err(|e| {
            tracing::warn!("item {} tags: {}", item, e);
            StoreError::Host(e)
        })
    }

    fn persist_tags(&self, item: ItemId, tags: Vec<String>) -> Result<(), StoreError> {
        self.host.set_tags(item, tags).map_err(|e| {
            tracing::warn!("item {} persist: {}", item, e);
            StoreError::Host(e)
        })
    }

    fn untag_all(&self, name: &str) -> Result<(), StoreError> {
        for id in self.host.find_by_tag(name).map_err(StoreError::Host)? {
            if let Some(tags) = self.item_tags(id)? {
                let remaining: Vec<String> =
                    tags.into_iter().filter(|t| t != name).collect();
                self.persist_tags(id, remaining)?;
            }
        }
        Ok(())
    }

    fn retag_all(&self, old: &str, new: &str) -> Result<(), StoreError> {
        for id in self.host.find_by_tag(old).map_err(StoreError::Host)? {
            if let Some(tags) = self.item_tags(id)? {
                // An item may already carry the new name; never duplicate it.
                let mut rewritten: Vec<String> =
                    tags.into_iter().filter(|t| t != old).collect();
                if !rewritten.iter().any(|t| t == new) {
                    rewritten.push(new.to_string());
                }
                self.persist_tags(id, rewritten)?;
            }
        }
        Ok(())
    }
}
