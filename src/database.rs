//! Embedded redb backend for the [`Store`] trait
//!
//! This module handles the setup of the redb database file and implements
//! point reads and writes against the `url_shortener` table.

use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::model::UrlMapping;
use crate::store::{Store, StoreError};

/// Table holding every URL mapping
///
/// Key: short ID
/// Value: JSON-serialized [`UrlMapping`]
///
/// Example:
/// - Key: "3f9a1c"
/// - Value: '{"short_id":"3f9a1c","long_url":"https://example.com"}'
pub const TABLE_URLS: TableDefinition<&str, &str> = TableDefinition::new("url_shortener");

/// Creates or opens the database file and makes sure the table exists
///
/// # Example
///
/// ```no_run
/// # use shortlink::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    // Opening the table in a write transaction creates it on first run
    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_URLS)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// [`Store`] implementation over a shared redb [`Database`]
///
/// redb is synchronous, so each operation runs on the blocking thread pool.
/// Write transactions are serialized by redb; reads see a consistent snapshot.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Opens (or creates) the database at `db_path`
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(init_db(db_path)?))
    }
}

fn write_mapping(db: &Database, record_json: &str, short_id: &str) -> Result<(), redb::Error> {
    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_URLS)?;
        table.insert(short_id, record_json)?;
    }
    write_txn.commit()?;
    Ok(())
}

fn read_mapping(db: &Database, short_id: &str) -> Result<Option<String>, redb::Error> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(TABLE_URLS)?;
    Ok(table.get(short_id)?.map(|value| value.value().to_string()))
}

#[async_trait]
impl Store for RedbStore {
    async fn put(&self, short_id: &str, long_url: &str) -> Result<(), StoreError> {
        let record = UrlMapping {
            short_id: short_id.to_string(),
            long_url: long_url.to_string(),
        };
        let record_json = serde_json::to_string(&record)?;

        let db = Arc::clone(&self.db);
        let key = record.short_id;
        tokio::task::spawn_blocking(move || write_mapping(&db, &record_json, &key)).await??;
        Ok(())
    }

    async fn get(&self, short_id: &str) -> Result<Option<String>, StoreError> {
        let db = Arc::clone(&self.db);
        let key = short_id.to_string();
        let raw = tokio::task::spawn_blocking(move || read_mapping(&db, &key)).await??;

        match raw {
            Some(json) => {
                let record: UrlMapping = serde_json::from_str(&json)?;
                Ok(Some(record.long_url))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_store() -> (RedbStore, NamedTempFile) {
        let temp_db = NamedTempFile::new().expect("Failed to create temp file");
        let store = RedbStore::open(temp_db.path().to_str().unwrap())
            .expect("Failed to initialize test database");
        (store, temp_db)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (store, _temp_db) = temp_store();

        store.put("abc123", "https://example.com/page").await.unwrap();

        let found = store.get("abc123").await.unwrap();
        assert_eq!(found.as_deref(), Some("https://example.com/page"));
    }

    #[tokio::test]
    async fn test_get_unknown_key() {
        let (store, _temp_db) = temp_store();
        assert!(store.get("zzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_is_stored_as_json() {
        let (store, _temp_db) = temp_store();
        store.put("abc123", "https://example.com").await.unwrap();

        let read_txn = store.db.begin_read().unwrap();
        let table = read_txn.open_table(TABLE_URLS).unwrap();
        let raw = table.get("abc123").unwrap().unwrap();
        let record: UrlMapping = serde_json::from_str(raw.value()).unwrap();

        assert_eq!(
            record,
            UrlMapping {
                short_id: "abc123".to_string(),
                long_url: "https://example.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let temp_db = NamedTempFile::new().unwrap();
        let path = temp_db.path().to_str().unwrap().to_string();

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("keep01", "https://example.com/kept").await.unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("keep01").await.unwrap().as_deref(),
            Some("https://example.com/kept")
        );
    }
}
