//! Durable key/value storage backing the locale preference.
//!
//! [`LocaleStorage`] mirrors the browser's local storage: string keys, string
//! values, synchronous access. On the web the console uses the page's local
//! storage through [`WebStorage`]. On desktop [`FileStorage`] keeps the whole
//! document as a JSON object on disk. [`MemoryStorage`] is used for headless
//! runs and tests.

use std::collections::HashMap;
use std::fs;
use std::path::{ Path, PathBuf };

use bevy::log::warn;
use serde_json::{ Map, Value };
use thiserror::Error;

const APP_NAME: &str = "netif-console";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("web storage failed: {0}")]
    Web(String),
}

pub trait LocaleStorage: Send + Sync + 'static {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with the given entries.
    pub fn with_items(items: HashMap<String, String>) -> Self {
        Self { items }
    }
}

impl LocaleStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object persisted at `path`.
///
/// The document is read once on [`FileStorage::open`] and rewritten in full on
/// every [`LocaleStorage::set_item`]. Entries that are not strings are kept
/// as they are but read back as absent.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Map<String, Value>,
}

impl FileStorage {
    /// Opens the document at `path`. A missing file is an empty document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Map::new()
        };
        Ok(Self { path, items })
    }

    /// An empty document at `path`. The file is overwritten on the next write.
    pub fn reset(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), items: Map::new() }
    }

    /// `<data dir>/netif-console/storage.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|mut path| {
            path.push(APP_NAME);
            path.push(STORAGE_FILE);
            path
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl LocaleStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), Value::String(value.to_string()));
        self.flush()
    }
}

/// The page's `window.localStorage`.
///
/// `web_sys` handles are not `Send`, so the storage is looked up on every
/// access instead of being held.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

#[cfg(target_arch = "wasm32")]
impl WebStorage {
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Web("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Web(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Web("local storage is disabled".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl LocaleStorage for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Web(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Web(format!("{e:?}")))
    }
}

/// Which storage the locale store is opened against.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(HashMap<String, String>),
    File(PathBuf),
    #[cfg(target_arch = "wasm32")]
    Web,
}

impl Default for StorageBackend {
    #[cfg(target_arch = "wasm32")]
    fn default() -> Self {
        StorageBackend::Web
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn default() -> Self {
        match FileStorage::default_path() {
            Some(path) => StorageBackend::File(path),
            None => StorageBackend::Memory(HashMap::new()),
        }
    }
}

impl StorageBackend {
    /// Opens the backend. A file that cannot be parsed is replaced by an empty
    /// document at the same path, so the next write repairs it.
    pub fn open(&self) -> Box<dyn LocaleStorage> {
        match self {
            StorageBackend::Memory(items) => Box::new(MemoryStorage::with_items(items.clone())),
            StorageBackend::File(path) =>
                match FileStorage::open(path) {
                    Ok(storage) => Box::new(storage),
                    Err(e) => {
                        warn!("Failed to open storage '{}', starting empty: {}", path.display(), e);
                        Box::new(FileStorage::reset(path))
                    }
                }
            #[cfg(target_arch = "wasm32")]
            StorageBackend::Web => Box::new(WebStorage),
        }
    }
}
