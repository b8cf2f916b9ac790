use chrono::Duration;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::models::StatsSnapshot;
use crate::storage::{CacheStore, CACHE_KEY};

pub struct SqliteCacheStore {
    conn: Mutex<Connection>,
    ttl: Duration,
}

impl SqliteCacheStore {
    pub fn new<P: AsRef<Path>>(path: P, ttl: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            ttl,
        };
        store.init_db()?;
        Ok(store)
    }

    pub fn in_memory(ttl: Duration) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            ttl,
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                payload TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Cache("cache connection lock poisoned".to_string()))
    }

    fn read_payload(&self) -> Result<Option<String>> {
        let result = self.conn()?.query_row(
            "SELECT payload FROM cache_entries WHERE key = ?1",
            params![CACHE_KEY],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(payload) => Ok(Some(payload)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(test)]
    fn write_payload(&self, payload: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO cache_entries (key, payload) VALUES (?1, ?2)",
            params![CACHE_KEY, payload],
        )?;
        Ok(())
    }
}

impl CacheStore for SqliteCacheStore {
    fn peek_stale(&self) -> Result<Option<StatsSnapshot>> {
        match self.read_payload()? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    fn write(&self, snapshot: &StatsSnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.conn()?.execute(
            r#"
            INSERT INTO cache_entries (key, payload)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET payload = excluded.payload
            "#,
            params![CACHE_KEY, payload],
        )?;
        tracing::debug!("Cached stats snapshot from {}", snapshot.last_updated);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn()?.execute(
            "DELETE FROM cache_entries WHERE key = ?1",
            params![CACHE_KEY],
        )?;
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::fixtures::snapshot_at;
    use chrono::Utc;

    #[test]
    fn test_round_trip_within_ttl() {
        let store = SqliteCacheStore::in_memory(Duration::hours(6)).unwrap();
        let snapshot = snapshot_at(Utc::now() - Duration::minutes(30));

        store.write(&snapshot).unwrap();
        assert_eq!(store.read().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_expired_entry_is_hidden_but_kept() {
        let store = SqliteCacheStore::in_memory(Duration::hours(6)).unwrap();
        let snapshot = snapshot_at(Utc::now() - Duration::hours(7));

        store.write(&snapshot).unwrap();
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(store.peek_stale().unwrap(), Some(snapshot));
        assert_eq!(store.age_hours().unwrap(), None);
    }

    #[test]
    fn test_write_overwrites_and_clear_removes() {
        let store = SqliteCacheStore::in_memory(Duration::hours(6)).unwrap();
        let older = snapshot_at(Utc::now() - Duration::hours(2));
        let newer = snapshot_at(Utc::now());

        store.write(&older).unwrap();
        store.write(&newer).unwrap();
        assert_eq!(store.peek_stale().unwrap(), Some(newer));

        store.clear().unwrap();
        assert_eq!(store.peek_stale().unwrap(), None);
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let store = SqliteCacheStore::in_memory(Duration::hours(6)).unwrap();
        store.write_payload("{not json").unwrap();
        assert!(matches!(store.peek_stale(), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_schema_holds_key_and_payload_only() {
        let store = SqliteCacheStore::in_memory(Duration::hours(6)).unwrap();
        let conn = store.conn().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('cache_entries')").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["key", "payload"]);
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");
        let snapshot = snapshot_at(Utc::now());

        SqliteCacheStore::new(&path, Duration::hours(6))
            .unwrap()
            .write(&snapshot)
            .unwrap();

        let reopened = SqliteCacheStore::new(&path, Duration::hours(6)).unwrap();
        assert_eq!(reopened.read().unwrap(), Some(snapshot));
        let age = reopened.age_hours().unwrap().unwrap();
        assert!(age >= 0.0 && age < 0.1);
    }
}
