use crate::errors::StoreError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::{error, warn};

pub const CHECKED_DATES_KEY: &str = "ul-app-checked-dates";
pub const NOTES_KEY: &str = "ul-app-notes";
pub const LAST_NOTIFICATION_KEY: &str = "ul-last-notification-date";
pub const PERMISSION_KEY: &str = "ul-notification-permission";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Reads `key` and parses it as JSON, falling back to `default` when the key
/// is absent, the store fails, or the payload does not parse.
pub async fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, "failed to parse stored value: {err}");
                default
            }
        },
        Ok(None) => default,
        Err(err) => {
            error!(key, "failed to read stored value: {err}");
            default
        }
    }
}

/// Serializes `value` under `key`. Failures are logged and otherwise ignored.
pub async fn save<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(err) => {
            error!(key, "failed to serialize value: {err}");
            return;
        }
    };

    if let Err(err) = store.set(key, payload).await {
        error!(key, "failed to save value: {err}");
    }
}

pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let entries = read_entries(&path).await;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse data file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read data file: {err}");
            BTreeMap::new()
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value);

        let written = match serde_json::to_vec_pretty(&*entries) {
            Ok(payload) => fs::write(&self.path, payload).await.map_err(StoreError::from),
            Err(err) => Err(err.into()),
        };

        // Keep the cache identical to what is on disk.
        if written.is_err() {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
        }
        written
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Fails every operation, like a disabled or full browser store.
    pub(crate) struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("storage disabled".into()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    #[tokio::test]
    async fn missing_key_yields_default() {
        let store = MemoryStore::new();
        let ids: Vec<String> = load(&store, CHECKED_DATES_KEY, Vec::new()).await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn corrupted_value_yields_default() {
        let store = MemoryStore::new();
        store
            .set(NOTES_KEY, "{not json".to_string())
            .await
            .unwrap();
        let notes: BTreeMap<String, String> = load(&store, NOTES_KEY, BTreeMap::new()).await;
        assert!(notes.is_empty());

        store
            .set(CHECKED_DATES_KEY, "{\"a\":1}".to_string())
            .await
            .unwrap();
        let ids: BTreeSet<String> = load(&store, CHECKED_DATES_KEY, BTreeSet::new()).await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn broken_store_never_raises() {
        let store = BrokenStore;
        save(&store, NOTES_KEY, &BTreeMap::from([("2025-11-15", "hi")])).await;
        let notes: BTreeMap<String, String> = load(&store, NOTES_KEY, BTreeMap::new()).await;
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileStore::open(&path).await.unwrap();
        let ids = BTreeSet::from(["2025-11-15".to_string(), "2025-11-16".to_string()]);
        let notes = BTreeMap::from([("2025-11-16".to_string(), "second day".to_string())]);
        save(&store, CHECKED_DATES_KEY, &ids).await;
        save(&store, NOTES_KEY, &notes).await;
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        let loaded_ids: BTreeSet<String> =
            load(&reopened, CHECKED_DATES_KEY, BTreeSet::new()).await;
        let loaded_notes: BTreeMap<String, String> =
            load(&reopened, NOTES_KEY, BTreeMap::new()).await;
        assert_eq!(loaded_ids, ids);
        assert_eq!(loaded_notes, notes);
    }

    #[tokio::test]
    async fn corrupted_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"\x00garbage").await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get(NOTES_KEY).await.unwrap(), None);
        assert_eq!(store.path(), path.as_path());
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.set(NOTES_KEY, "{}".to_string()).await.is_err());
        assert_eq!(store.get(NOTES_KEY).await.unwrap(), None);
    }
}
