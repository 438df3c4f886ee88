use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;

use crate::{
    db_types::{NewSession, Session},
    traits::{SessionError, SessionManagement},
};

/// Seven days.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// `SessionApi` issues and resolves login sessions. The session key is the only thing the client holds.
pub struct SessionApi<S> {
    store: S,
    ttl: Duration,
}

impl<S: Debug> Debug for SessionApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionApi ({:?}, ttl: {}s)", self.store, self.ttl.num_seconds())
    }
}

impl<S> SessionApi<S>
where S: SessionManagement
{
    pub fn new(store: S) -> Self {
        Self { store, ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS) }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn start_session(&self, user_id: i64) -> Result<Session, SessionError> {
        let session = self.store.create_session(NewSession::new(user_id, Utc::now() + self.ttl)).await?;
        debug!("🔐️ Started session for user #{user_id}, valid until {}", session.expires_at);
        Ok(session)
    }

    /// The live session for `key`. Expired and unknown keys both resolve to `None`.
    pub async fn resolve(&self, key: &str) -> Result<Option<Session>, SessionError> {
        let session = self.store.fetch_session(key).await?;
        Ok(session.filter(|s| !s.is_expired()))
    }

    pub async fn end_session(&self, key: &str) -> Result<bool, SessionError> {
        self.store.destroy_session(key).await
    }

    pub async fn purge_expired(&self) -> Result<u64, SessionError> {
        let count = self.store.purge_expired_sessions().await?;
        if count > 0 {
            info!("🔐️ Purged {count} expired sessions");
        }
        Ok(count)
    }
}
