//! In-memory session state, hydrated from and written through to the
//! credential store.

use crate::auth::{CredentialStore, User};
use crate::error::StorageError;
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// A write against the session. Each action touches only its own field,
/// except `Clear`, which resets everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetToken(String),
    SetUser(User),
    Clear,
}

/// Shared handle on the one session of the process.
///
/// Only obtainable through [`SessionStore::hydrate`], so nothing can read a
/// token before the persisted one has been loaded. Clones share state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    credentials: CredentialStore,
}

impl SessionStore {
    /// Load the persisted session into memory.
    pub fn hydrate(credentials: CredentialStore) -> Self {
        let session = Session {
            token: credentials.get(),
            user: credentials.user(),
        };

        tracing::info!(
            "Session hydrated ({})",
            if session.is_authenticated() {
                "signed in"
            } else {
                "signed out"
            }
        );

        Self {
            state: Arc::new(RwLock::new(session)),
            credentials,
        }
    }

    /// Snapshot of the current session.
    pub fn select(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Apply `action`, persisting it before it becomes visible.
    ///
    /// If persisting `SetToken`/`SetUser` fails the in-memory session is left
    /// untouched and the error returned. `Clear` always empties the in-memory
    /// session; a failure to clear storage is still returned.
    pub fn dispatch(&self, action: SessionAction) -> Result<(), StorageError> {
        let mut state = self.write();

        match &action {
            SessionAction::SetToken(token) => self.credentials.set(token)?,
            SessionAction::SetUser(user) => self.credentials.set_user(user)?,
            SessionAction::Clear => {
                *state = Session::default();
                self.credentials.clear()?;
                tracing::info!("Session cleared");
                return Ok(());
            }
        }

        *state = reduce(std::mem::take(&mut *state), action);
        Ok(())
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn reduce(state: Session, action: SessionAction) -> Session {
    match action {
        SessionAction::SetToken(token) => Session {
            token: Some(token),
            ..state
        },
        SessionAction::SetUser(user) => Session {
            user: Some(user),
            ..state
        },
        SessionAction::Clear => Session::default(),
    }
}
