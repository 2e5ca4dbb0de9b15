//! # Session Identity
//!
//! Every chat turn carries a `conversationId` so the backend can correlate
//! the conversation. The id is generated once, stored under [`SESSION_KEY`],
//! and reused for as long as the store keeps it.
//!
//! The id lives in a [`SessionContext`] handed to the client at construction;
//! nothing reads the store behind the client's back.

use log::{info, warn};

use crate::core::storage::{KeyValueStore, StorageError};

/// Storage key holding the session id.
pub const SESSION_KEY: &str = "cid";

/// Length of a generated session id, in base-36 digits.
pub const SESSION_ID_LEN: usize = 11;

/// Generate a new pseudo-random base-36 session id.
pub fn new_session_id() -> String {
    let mut bits = uuid::Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(SESSION_ID_LEN);
    while id.len() < SESSION_ID_LEN {
        let digit = (bits % 36) as u32;
        id.push(char::from_digit(digit, 36).unwrap_or('0'));
        bits /= 36;
    }
    id
}

/// Return the stored session id, generating and persisting one if absent.
///
/// An empty stored value counts as absent, as does a corrupt store (the
/// write that follows replaces it).
pub fn ensure_session_id(store: &dyn KeyValueStore) -> Result<String, StorageError> {
    let stored = match store.get(SESSION_KEY) {
        Ok(stored) => stored,
        Err(StorageError::Corrupt(e)) => {
            warn!("Discarding unreadable session storage: {}", e);
            None
        }
        Err(e) => return Err(e),
    };
    if let Some(existing) = stored
        && !existing.is_empty()
    {
        return Ok(existing);
    }

    let id = new_session_id();
    store.set(SESSION_KEY, &id)?;
    info!("Created new session id {}", id);
    Ok(id)
}

/// The session the client is running under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    id: String,
    persisted: bool,
}

impl SessionContext {
    /// Resolve the session from durable storage.
    pub fn ensure(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        Ok(Self {
            id: ensure_session_id(store)?,
            persisted: true,
        })
    }

    /// A session that lives only as long as this process.
    pub fn ephemeral() -> Self {
        Self {
            id: new_session_id(),
            persisted: false,
        }
    }

    /// Like [`ensure`](Self::ensure), but falls back to an ephemeral
    /// session. The error is returned alongside so the caller can tell the
    /// user.
    pub fn ensure_or_ephemeral(store: &dyn KeyValueStore) -> (Self, Option<StorageError>) {
        match Self::ensure(store) {
            Ok(session) => (session, None),
            Err(e) => {
                warn!("Session storage unavailable, using ephemeral id: {}", e);
                (Self::ephemeral(), Some(e))
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// False when the id will not survive a restart.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }
}
