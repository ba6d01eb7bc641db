//! Durable key-value persistence
//!
//! The engine never touches a global store. It is handed a `KeyValueStore`
//! and every read or write through it is best effort:
//! - failures are logged and swallowed
//! - absent or corrupt values fall back to defaults

#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

/// Best score key
pub const BEST_SCORE_KEY: &str = "qa-bug-hunt-best-score";
/// Sound toggle key ("true"/"false")
pub const SOUND_KEY: &str = "qa-bug-hunt-sound";
/// Haptics toggle key ("true"/"false")
pub const HAPTICS_KEY: &str = "qa-bug-hunt-haptics";
/// Motion preference key ("on"/"off", absent = auto)
pub const MOTION_KEY: &str = "jb-motion-preference";

/// String key-value storage capability
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// to what the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    denied: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        store
    }

    /// Make every subsequent operation fail with `StorageError::Denied`
    pub fn set_denied(&self, denied: bool) {
        self.denied.set(denied);
    }

    /// Raw read that bypasses the denial switch
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn check_access(&self) -> Result<(), StorageError> {
        if self.denied.get() {
            Err(StorageError::Denied("memory store locked".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_access()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_access()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_access()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read a raw value, treating any failure as absence
pub fn read_string(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Reading '{}' failed: {}", key, e);
            None
        }
    }
}

/// Write a raw value, logging and ignoring failure
pub fn write_string(store: &mut dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::warn!("Writing '{}' failed: {}", key, e);
    }
}

/// Remove a value, logging and ignoring failure
pub fn remove_key(store: &mut dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        log::warn!("Removing '{}' failed: {}", key, e);
    }
}

/// Read a "true"/"false" flag; anything else yields `fallback`
pub fn read_bool(store: &dyn KeyValueStore, key: &str, fallback: bool) -> bool {
    match read_string(store, key).as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => fallback,
    }
}

pub fn write_bool(store: &mut dyn KeyValueStore, key: &str, value: bool) {
    write_string(store, key, if value { "true" } else { "false" });
}

/// Read the best score. Non-numeric, non-finite and non-positive values read as 0.
pub fn read_best_score(store: &dyn KeyValueStore) -> u64 {
    let Some(raw) = read_string(store, BEST_SCORE_KEY) else {
        return 0;
    };
    match raw.trim().parse::<f64>() {
        Ok(score) if score.is_finite() && score > 0.0 => score.floor() as u64,
        _ => {
            log::warn!("Ignoring invalid stored best score {:?}", raw);
            0
        }
    }
}

pub fn write_best_score(store: &mut dyn KeyValueStore, score: u64) {
    write_string(store, BEST_SCORE_KEY, &score.to_string());
}
