//! Credential persistence.
//!
//! Provides durable storage of the access token and user record, with the
//! platform keyring preferred and a file store as fallback.

mod credentials;
pub mod storage;

pub use credentials::{CredentialStore, User};
pub use storage::{FileStorage, MemoryStorage, Storage};

#[cfg(feature = "keyring-storage")]
pub use storage::KeyringStorage;
