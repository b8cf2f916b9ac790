use chrono::Duration;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::StatsSnapshot;
use crate::storage::CacheStore;

/// Keeps the serialized snapshot in process memory.
pub struct MemoryCacheStore {
    payload: Mutex<Option<String>>,
    ttl: Duration,
}

impl MemoryCacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            payload: Mutex::new(None),
            ttl,
        }
    }

    /// Stores raw text as-is, bypassing serialization.
    pub fn insert_raw(&self, payload: impl Into<String>) -> Result<()> {
        *self.lock()? = Some(payload.into());
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.payload
            .lock()
            .map_err(|_| Error::Cache("memory cache lock poisoned".to_string()))
    }
}

impl CacheStore for MemoryCacheStore {
    fn peek_stale(&self) -> Result<Option<StatsSnapshot>> {
        match self.lock()?.as_deref() {
            Some(payload) => Ok(Some(serde_json::from_str(payload)?)),
            None => Ok(None),
        }
    }

    fn write(&self, snapshot: &StatsSnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        *self.lock()? = Some(payload);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
