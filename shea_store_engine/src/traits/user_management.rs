use thiserror::Error;

use crate::db_types::{NewUser, User};

#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("An account with email {0} already exists")]
    EmailAlreadyExists(String),
}

impl From<sqlx::Error> for UserError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait UserManagement: Clone {
    /// Creates a user. Email uniqueness is enforced by the backend, so two concurrent registrations with the same
    /// address cannot both succeed. The loser receives [`UserError::EmailAlreadyExists`].
    async fn insert_user(&self, user: NewUser) -> Result<User, UserError>;

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, UserError>;

    /// Looks a user up by (normalized) email address.
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
