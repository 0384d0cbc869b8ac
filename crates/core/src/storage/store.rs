use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::CoreError;

/// The abstract key-value store every platform shell provides: string
/// keys, string values, async access. The core never assumes anything
/// about the backing medium beyond this contract.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    async fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// Wipe every key. Only the full-reset path uses this.
    async fn clear(&self) -> Result<(), CoreError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key).await
    }

    async fn clear(&self) -> Result<(), CoreError> {
        (**self).clear().await
    }
}

/// Process-local store backed by a `HashMap`. The default backend for
/// tests and headless embedding; real shells wrap their platform storage
/// behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("storage mutex poisoned".into()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.lock()?.clear();
        Ok(())
    }
}
