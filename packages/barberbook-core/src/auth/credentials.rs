//! Typed access to the persisted access token and user record.

use super::storage::{self, Storage};
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the bearer token
const TOKEN_KEY: &str = "token";
/// Storage key for the signed-in user record (JSON)
const USER_KEY: &str = "user";

/// Minimal record of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Thin typed wrapper over a [`Storage`] backend.
///
/// Reads fail open: a storage error is logged and reported as "absent".
/// Writes report their errors since the credential may not have been saved.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Open the store on the platform's default backend.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(storage::default_storage()?))
    }

    pub fn get(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token, treating as signed out: {}", e);
                None
            }
        }
    }

    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, token)?;
        tracing::debug!("Access token saved");
        Ok(())
    }

    pub fn user(&self) -> Option<User> {
        let json = match self.storage.get_item(USER_KEY) {
            Ok(json) => json?,
            Err(e) => {
                tracing::warn!("Failed to read stored user record: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Stored user record is malformed, ignoring: {}", e);
                None
            }
        }
    }

    pub fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let json = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &json)?;
        tracing::debug!("User record saved for {}", user.name);
        Ok(())
    }

    /// Remove the token and user record.
    ///
    /// Both removals are attempted; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove_item(TOKEN_KEY);
        let user = self.storage.remove_item(USER_KEY);
        token.and(user)?;
        tracing::debug!("Stored credentials cleared");
        Ok(())
    }

    /// Where credentials are kept (for status output)
    pub fn storage_info(&self) -> String {
        self.storage.describe()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("storage", &self.storage.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::{FileStorage, MemoryStorage};

    /// Storage whose every call fails, as a locked keyring or unreadable disk would.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::NoConfigDir)
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::NoConfigDir)
        }
        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::NoConfigDir)
        }
        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Jordan".to_string(),
            email: Some("jordan@example.com".to_string()),
            phone: None,
        }
    }

    #[test]
    fn test_missing_token_is_absent() {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        assert_eq!(store.get(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_set_get_clear() {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        store.set("abc").unwrap();
        store.set_user(&user()).unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert_eq!(store.user(), Some(user()));

        store.clear().unwrap();
        assert_eq!(store.get(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".credentials");

        CredentialStore::new(Arc::new(FileStorage::new(&path)))
            .set("persisted")
            .unwrap();

        let reopened = CredentialStore::new(Arc::new(FileStorage::new(&path)));
        assert_eq!(reopened.get().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_read_failures_fail_open_and_writes_surface() {
        let store = CredentialStore::new(Arc::new(BrokenStorage));
        assert_eq!(store.get(), None);
        assert_eq!(store.user(), None);
        assert!(store.set("abc").is_err());
        assert!(store.set_user(&user()).is_err());
        assert!(store.clear().is_err());
    }

    #[test]
    fn test_malformed_user_record_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(USER_KEY, "{\"id\": 7}").unwrap();
        let store = CredentialStore::new(storage);
        assert_eq!(store.user(), None);
    }
}
