use chrono::Utc;
use sqlx::SqliteConnection;

use super::first_row;
use crate::db_types::{NewSession, Session};

pub async fn insert_session(session: NewSession, conn: &mut SqliteConnection) -> Result<Session, sqlx::Error> {
    sqlx::query_as("INSERT INTO sessions (session_key, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *;")
        .bind(session.key)
        .bind(session.user_id)
        .bind(session.expires_at)
        .fetch_all(conn)
        .await
        .and_then(first_row)
}

/// Fetches the session for `key`, ignoring it if it has expired.
pub async fn fetch_live_session(key: &str, conn: &mut SqliteConnection) -> Result<Option<Session>, sqlx::Error> {
    let session: Option<Session> = sqlx::query_as("SELECT * FROM sessions WHERE session_key = $1")
        .bind(key)
        .fetch_optional(conn)
        .await?;
    Ok(session.filter(|s| !s.is_expired()))
}

pub async fn delete_session(key: &str, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE session_key = $1").bind(key).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Timestamps are bound with the same encoding they were stored with, so the text comparison orders them correctly.
pub async fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1").bind(Utc::now()).execute(conn).await?;
    Ok(result.rows_affected())
}
