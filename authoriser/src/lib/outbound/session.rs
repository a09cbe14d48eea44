use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::auth::errors::SessionError;
use crate::auth::ports::SessionStore;

/// In-process session store.
///
/// The stand-in for browser-local persistent storage: a mutexed key-value
/// map, last-writer-wins. Clones share the same underlying slots, the way
/// two page loads share one browser store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }
}
