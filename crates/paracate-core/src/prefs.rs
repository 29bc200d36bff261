//! Preference-backed category storage.
//!
//! The host exposes a flat key/value preference store; the category set is
//! a JSON-encoded array of strings under a single key. Uniqueness here is
//! application-enforced: every mutation holds the store lock across the
//! whole read-modify-write, so one mutation is in flight at a time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::backend::CategoryBackend;
use crate::error::StoreError;

/// Preference key holding the JSON-encoded category array.
pub const DEFAULT_PREF_KEY: &str = "extensions.paracate.categories";

/// Key/value preference store as the host exposes it.
pub trait PrefStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory preference store (for testing).
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Category backend over a [`PrefStore`].
pub struct PrefsBackend<P: PrefStore> {
    prefs: Mutex<P>,
    key: String,
}

impl<P: PrefStore> PrefsBackend<P> {
    /// Wrap a preference store under [`DEFAULT_PREF_KEY`], seeding the key
    /// with an empty array if absent.
    pub fn new(prefs: P) -> Result<Self, StoreError> {
        Self::with_key(prefs, DEFAULT_PREF_KEY)
    }

    /// Same as [`PrefsBackend::new`] with an explicit preference key.
    pub fn with_key(prefs: P, key: &str) -> Result<Self, StoreError> {
        let backend = Self {
            prefs: Mutex::new(prefs),
            key: key.to_string(),
        };
        backend.initialize()?;
        Ok(backend)
    }

    fn lock(&self) -> Result<MutexGuard<'_, P>, StoreError> {
        self.prefs
            .lock()
            .map_err(|e| StoreError::Storage(format!("prefs lock: {}", e)))
    }

    fn read(prefs: &P, key: &str) -> Result<Vec<String>, StoreError> {
        match prefs.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StoreError::Storage(format!("parse categories: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    fn write(prefs: &mut P, key: &str, names: &[String]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(names)
            .map_err(|e| StoreError::Storage(format!("encode categories: {}", e)))?;
        prefs.set(key, &raw)
    }
}

impl<P: PrefStore> CategoryBackend for PrefsBackend<P> {
    fn initialize(&self) -> Result<(), StoreError> {
        let mut prefs = self.lock()?;
        if prefs.get(&self.key)?.is_none() {
            Self::write(&mut prefs, &self.key, &[])?;
        }
        Ok(())
    }

    fn insert(&self, name: &str) -> Result<bool, StoreError> {
        let mut prefs = self.lock()?;
        let mut names = Self::read(&prefs, &self.key)?;
        if names.iter().any(|n| n == name) {
            return Ok(false);
        }
        names.push(name.to_string());
        Self::write(&mut prefs, &self.key, &names)?;
        Ok(true)
    }

    fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let mut prefs = self.lock()?;
        let mut names = Self::read(&prefs, &self.key)?;
        let before = names.len();
        names.retain(|n| n != name);
        if names.len() == before {
            return Ok(false);
        }
        Self::write(&mut prefs, &self.key, &names)?;
        Ok(true)
    }

    fn rename(&self, old: &str, new: &str) -> Result<bool, StoreError> {
        let mut prefs = self.lock()?;
        let mut names = Self::read(&prefs, &self.key)?;
        if names.iter().any(|n| n == new) {
            return Ok(false);
        }
        let slot = match names.iter().position(|n| n == old) {
            Some(i) => i,
            None => return Ok(false),
        };
        names[slot] = new.to_string();
        Self::write(&mut prefs, &self.key, &names)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let prefs = self.lock()?;
        Self::read(&prefs, &self.key)
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        let prefs = self.lock()?;
        Ok(Self::read(&prefs, &self.key)?.iter().any(|n| n == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Shared handle so a "reopened" backend sees the same underlying store.
    #[derive(Clone, Default)]
    struct SharedPrefs(Arc<Mutex<MemoryPrefs>>);

    impl PrefStore for SharedPrefs {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.lock().unwrap().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().set(key, value)
        }
    }

    #[test]
    fn initialize_seeds_empty_array() {
        let prefs = SharedPrefs::default();
        let _backend = PrefsBackend::new(prefs.clone()).unwrap();
        let raw = prefs.get(DEFAULT_PREF_KEY).unwrap().unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn initialize_twice_keeps_existing_names() {
        let backend = PrefsBackend::new(MemoryPrefs::new()).unwrap();
        assert!(backend.insert("Fieldwork").unwrap());
        backend.initialize().unwrap();
        assert_eq!(backend.list().unwrap(), vec!["Fieldwork"]);
    }

    #[test]
    fn insert_reports_duplicate() {
        let backend = PrefsBackend::new(MemoryPrefs::new()).unwrap();
        assert!(backend.insert("Fieldwork").unwrap());
        assert!(!backend.insert("Fieldwork").unwrap());
        assert_eq!(backend.list().unwrap().len(), 1);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let backend = PrefsBackend::new(MemoryPrefs::new()).unwrap();
        backend.insert("Zoology").unwrap();
        backend.insert("Archive").unwrap();
        assert_eq!(backend.list().unwrap(), vec!["Zoology", "Archive"]);
    }

    #[test]
    fn remove_absent_reports_false() {
        let backend = PrefsBackend::new(MemoryPrefs::new()).unwrap();
        assert!(!backend.remove("Ghost").unwrap());
    }

    #[test]
    fn rename_collision_leaves_set_unchanged() {
        let backend = PrefsBackend::new(MemoryPrefs::new()).unwrap();
        backend.insert("A").unwrap();
        backend.insert("B").unwrap();
        assert!(!backend.rename("A", "B").unwrap());
        assert_eq!(backend.list().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn rename_keeps_position() {
        let backend = PrefsBackend::new(MemoryPrefs::new()).unwrap();
        backend.insert("A").unwrap();
        backend.insert("B").unwrap();
        assert!(backend.rename("A", "C").unwrap());
        assert_eq!(backend.list().unwrap(), vec!["C", "B"]);
    }

    #[test]
    fn survives_reopen() {
        let prefs = SharedPrefs::default();
        {
            let backend = PrefsBackend::new(prefs.clone()).unwrap();
            backend.insert("Fieldwork").unwrap();
        }
        let backend = PrefsBackend::new(prefs).unwrap();
        assert_eq!(backend.list().unwrap(), vec!["Fieldwork"]);
    }

    #[test]
    fn malformed_payload_is_storage_error() {
        let mut prefs = MemoryPrefs::new();
        prefs.set(DEFAULT_PREF_KEY, "not json").unwrap();
        let backend = PrefsBackend::new(prefs).unwrap();
        assert!(matches!(backend.list(), Err(StoreError::Storage(_))));
    }
}
