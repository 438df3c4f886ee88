use thiserror::Error;

use crate::db_types::{NewSession, Session};

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Session store error: {0}")]
    StoreError(String),
}

impl From<sqlx::Error> for SessionError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// A server-side session store keyed by an opaque session key.
///
/// Backends hold nothing but the user id and the expiry time for each key.
#[allow(async_fn_in_trait)]
pub trait SessionManagement: Clone {
    /// Stores a new session.
    async fn create_session(&self, session: NewSession) -> Result<Session, SessionError>;

    /// Fetches a live session. Expired sessions are reported as `None`.
    async fn fetch_session(&self, key: &str) -> Result<Option<Session>, SessionError>;

    /// Removes a session. Returns whether it existed.
    async fn destroy_session(&self, key: &str) -> Result<bool, SessionError>;

    /// Deletes every expired session and returns how many were removed.
    async fn purge_expired_sessions(&self) -> Result<u64, SessionError>;
}
