// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The session store: who is logged in right now.
//!
//! The in-memory value is the source of truth. Storage only mirrors it so the
//! identity survives a restart, and is read back solely by [`SessionStore::hydrate`].

use log::{debug, warn};

use crate::{
    error::{self, Result},
    session::{Record, Session},
    storage::Storage,
};

/// The storage key the current session is mirrored under.
pub(crate) const CURRENT_USER_KEY: &str = "currentUser";

/// How far a change to the session made it.
#[derive(Debug)]
#[must_use]
pub(crate) enum Persistence {
    /// The change was written to persistent storage.
    Durable,
    /// The change was written, but the backend does not outlive the process.
    Ephemeral,
    /// The in-memory session changed, but storage could not be updated.
    Failed(error::Error),
}

impl Persistence {
    fn from_write<S: Storage + ?Sized>(storage: &S, result: Result<()>) -> Self {
        match result {
            Ok(()) if storage.is_persistent() => Self::Durable,
            Ok(()) => Self::Ephemeral,
            Err(e) => Self::Failed(e),
        }
    }

    pub(crate) const fn is_failed(&self) -> bool {
        matches!(*self, Self::Failed(_))
    }
}

pub(crate) struct SessionStore<S> {
    storage: S,
    current: Option<Session>,
}

impl<S: Storage> SessionStore<S> {
    /// Create an empty store over `storage`. Nothing is read until
    /// [`hydrate`](Self::hydrate) is called.
    pub(crate) const fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Replace the in-memory session with whatever storage holds.
    ///
    /// Never fails: an unreadable or malformed entry leaves the store logged
    /// out, and a malformed entry is removed so it is not read again.
    pub(crate) fn hydrate(&mut self) -> Option<&Session> {
        self.current = match self.storage.get_item(CURRENT_USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => {
                    debug!("Restored the session for {}", session.username());
                    Some(session)
                }
                Err(e) => {
                    warn!("Ignoring the stored session because it is malformed: {}", e);
                    if let Err(e) = self.storage.remove_item(CURRENT_USER_KEY) {
                        warn!("We could not remove the malformed session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Treating the session as logged out because storage could not be read: {}", e);
                None
            }
        };
        self.current.as_ref()
    }

    pub(crate) const fn current_user(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Make `session` the current session and mirror it to storage.
    ///
    /// The in-memory session is replaced even when storage rejects the write.
    pub(crate) fn set_user(&mut self, session: Session) -> Persistence {
        let write = serde_json::to_string(&session)
            .map_err(error::Error::from)
            .and_then(|raw| self.storage.set_item(CURRENT_USER_KEY, &raw));
        debug!("Logged in as {}", session.username());
        self.current = Some(session);

        let outcome = Persistence::from_write(&self.storage, write);
        if let Persistence::Failed(ref e) = outcome {
            warn!("The session is only kept in memory because it could not be saved: {}", e);
        }
        outcome
    }

    /// Validate an untrusted user record, then [`set_user`](Self::set_user).
    ///
    /// An incomplete record is rejected before anything changes.
    pub(crate) fn set_user_record(&mut self, record: Record) -> Result<Persistence> {
        let session = Session::try_from(record)?;
        Ok(self.set_user(session))
    }

    /// Log out. Clearing an empty store is not an error.
    pub(crate) fn clear_user(&mut self) -> Persistence {
        if let Some(previous) = self.current.take() {
            debug!("Logged out {}", previous.username());
        }

        let remove = self.storage.remove_item(CURRENT_USER_KEY);
        let outcome = Persistence::from_write(&self.storage, remove);
        if let Persistence::Failed(ref e) = outcome {
            warn!("The stored session could not be removed: {}", e);
        }
        outcome
    }

    pub(crate) const fn storage(&self) -> &S {
        &self.storage
    }

    #[allow(dead_code)]
    pub(crate) fn into_storage(self) -> S {
        self.storage
    }
}
