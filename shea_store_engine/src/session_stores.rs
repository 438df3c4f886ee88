//! Session store backends.
//!
//! Sessions can live in the SQLite database alongside everything else, or in process memory. The memory store is
//! faster and needs no cleanup on restart, at the cost of logging everyone out whenever the server restarts.
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::Utc;
use log::*;

use crate::{
    db_types::{NewSession, Session},
    traits::{SessionError, SessionManagement},
    SqliteDatabase,
};

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions held, expired or not.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::StoreError("session store lock is poisoned".to_string())
}

impl SessionManagement for MemorySessionStore {
    async fn create_session(&self, session: NewSession) -> Result<Session, SessionError> {
        let session =
            Session { key: session.key, user_id: session.user_id, expires_at: session.expires_at, created_at: Utc::now() };
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.insert(session.key.clone(), session.clone());
        Ok(session)
    }

    async fn fetch_session(&self, key: &str) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(key).filter(|s| !s.is_expired()).cloned())
    }

    async fn destroy_session(&self, key: &str) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        Ok(sessions.remove(key).is_some())
    }

    async fn purge_expired_sessions(&self) -> Result<u64, SessionError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        let purged = (before - sessions.len()) as u64;
        trace!("🔐️ {purged} sessions purged from memory");
        Ok(purged)
    }
}

/// The session backend chosen at start-up.
#[derive(Debug, Clone)]
pub enum SessionStore {
    Sqlite(SqliteDatabase),
    Memory(MemorySessionStore),
}

impl SessionManagement for SessionStore {
    async fn create_session(&self, session: NewSession) -> Result<Session, SessionError> {
        match self {
            Self::Sqlite(db) => db.create_session(session).await,
            Self::Memory(store) => store.create_session(session).await,
        }
    }

    async fn fetch_session(&self, key: &str) -> Result<Option<Session>, SessionError> {
        match self {
            Self::Sqlite(db) => db.fetch_session(key).await,
            Self::Memory(store) => store.fetch_session(key).await,
        }
    }

    async fn destroy_session(&self, key: &str) -> Result<bool, SessionError> {
        match self {
            Self::Sqlite(db) => db.destroy_session(key).await,
            Self::Memory(store) => store.destroy_session(key).await,
        }
    }

    async fn purge_expired_sessions(&self) -> Result<u64, SessionError> {
        match self {
            Self::Sqlite(db) => db.purge_expired_sessions().await,
            Self::Memory(store) => store.purge_expired_sessions().await,
        }
    }
}
