//! Key/value persistence backends for the credential store.
//!
//! Storage priority:
//! 1. Platform keyring (if `keyring-storage` is enabled, `file-storage` is
//!    not, and the keyring is available)
//! 2. File-based storage (JSON map, owner-only permissions on Unix)

use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[cfg(feature = "keyring-storage")]
use keyring::Entry;

/// Service name used for keyring storage
#[cfg(feature = "keyring-storage")]
const KEYRING_SERVICE: &str = "barberbook";

/// Durable string storage keyed by well-known names.
///
/// A missing key is `Ok(None)`, never an error.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Human-readable location, for status output.
    fn describe(&self) -> String;
}

/// Get the barberbook config directory
pub fn config_dir() -> Result<PathBuf, StorageError> {
    let config_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .ok_or(StorageError::NoConfigDir)?;
    Ok(config_dir.join("barberbook"))
}

/// Storage backend chosen by the enabled features.
pub fn default_storage() -> Result<Arc<dyn Storage>, StorageError> {
    let file = FileStorage::new(config_dir()?.join(".credentials"));

    #[cfg(all(feature = "keyring-storage", not(feature = "file-storage")))]
    let storage: Arc<dyn Storage> = Arc::new(KeyringStorage::new(file));

    // `file-storage` wins over the default keyring
    #[cfg(any(feature = "file-storage", not(feature = "keyring-storage")))]
    let storage: Arc<dyn Storage> = Arc::new(file);

    Ok(storage)
}

// ============================================================================
// File-based storage (always available)
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if map.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(map)?;

        // Set restrictive permissions on Unix before writing
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600) // Owner read/write only
                .open(&self.path)?;
            let mut file = std::io::BufWriter::new(file);
            file.write_all(json.as_bytes())?;
            file.flush()?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, &json)?;
        }

        tracing::debug!("Credential file written: {:?}", self.path);
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("File-based storage: {}", self.path.display())
    }
}

// ============================================================================
// Keyring-based storage (optional, platform-specific)
// ============================================================================

/// Platform keyring with the file store as fallback and backup.
///
/// Entries are created once per key and reused for the life of the store.
#[cfg(feature = "keyring-storage")]
pub struct KeyringStorage {
    fallback: FileStorage,
    entries: Mutex<BTreeMap<String, Arc<Entry>>>,
}

#[cfg(feature = "keyring-storage")]
impl KeyringStorage {
    pub fn new(fallback: FileStorage) -> Self {
        Self {
            fallback,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    fn entry(&self, key: &str) -> Result<Arc<Entry>, StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(entry));
        }

        tracing::trace!(
            "Creating keyring entry for service='{}', user='{}'",
            KEYRING_SERVICE,
            key
        );
        let entry = Entry::new(KEYRING_SERVICE, key).map_err(|e| {
            tracing::error!(
                "Failed to create keyring entry (service='{}', user='{}'): {}",
                KEYRING_SERVICE,
                key,
                e
            );
            StorageError::Keyring(e.to_string())
        })?;
        let entry = Arc::new(entry);
        entries.insert(key.to_string(), Arc::clone(&entry));
        Ok(entry)
    }
}

#[cfg(feature = "keyring-storage")]
impl std::fmt::Debug for KeyringStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringStorage")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "keyring-storage")]
impl Storage for KeyringStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = match self.entry(key) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Keyring unavailable for reading: {}, trying file fallback", e);
                return self.fallback.get_item(key);
            }
        };

        match entry.get_password() {
            Ok(value) => {
                tracing::debug!("'{}' loaded from keyring", key);
                Ok(Some(value))
            }
            Err(keyring::Error::NoEntry) => {
                tracing::debug!("No '{}' in keyring, trying file fallback", key);
                self.fallback.get_item(key)
            }
            Err(e) => {
                tracing::warn!("Failed to read '{}' from keyring: {}, trying file fallback", key, e);
                self.fallback.get_item(key)
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let entry = match self.entry(key) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Keyring unavailable for saving: {}, using file storage", e);
                return self.fallback.set_item(key, value);
            }
        };

        if let Err(e) = entry.set_password(value) {
            tracing::warn!("Failed to save '{}' to keyring: {}, using file storage", key, e);
            return self.fallback.set_item(key, value);
        }

        // Also save to file as backup
        if let Err(e) = self.fallback.set_item(key, value) {
            tracing::debug!("Failed to save backup of '{}' to file: {}", key, e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key).map(|entry| entry.delete_credential()) {
            Ok(Ok(())) | Ok(Err(keyring::Error::NoEntry)) => {
                tracing::debug!("'{}' removed from keyring", key);
            }
            Ok(Err(e)) => {
                tracing::warn!("Failed to delete '{}' from keyring: {}, clearing file storage", key, e);
            }
            Err(e) => {
                tracing::warn!("Keyring unavailable for deleting: {}, clearing file storage", e);
            }
        }

        // Reads fall back to the file, so a copy left there would come back
        self.fallback.remove_item(key)
    }

    fn describe(&self) -> String {
        #[cfg(target_os = "windows")]
        let platform = "Windows Credential Manager";
        #[cfg(target_os = "macos")]
        let platform = "macOS Keychain";
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let platform = "Linux Secret Service (GNOME Keyring/KWallet)";

        format!("{} (with file fallback: {})", platform, self.fallback.path.display())
    }
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Non-durable storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items().remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "In-memory storage".to_string()
    }
}
