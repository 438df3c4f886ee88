use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{normalize_email, NewUser, User},
    helpers::{hash_password, verify_password},
    store_api::errors::AuthApiError,
    traits::UserManagement,
};

/// `AuthApi` registers customers and checks their credentials.
///
/// Passwords are stored as Argon2id hashes and never leave this API. Emails are compared case-insensitively.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthApiError> {
        let email = normalize_email(email);
        if self.db.fetch_user_by_email(&email).await?.is_some() {
            return Err(AuthApiError::EmailAlreadyExists(email));
        }
        let password_hash = hash_password(password)?;
        let user = self.db.insert_user(NewUser { name: name.trim().to_string(), email, password_hash }).await?;
        info!("🔐️ Registered user #{} ({})", user.id, user.email);
        Ok(user)
    }

    /// Returns the user if `password` matches. An unknown email and a wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthApiError> {
        let email = normalize_email(email);
        let user = self.db.fetch_user_by_email(&email).await?;
        match user {
            Some(user) if verify_password(password, &user.password_hash) => {
                debug!("🔐️ User #{} authenticated", user.id);
                Ok(user)
            },
            _ => {
                debug!("🔐️ Failed login attempt for {email}");
                Err(AuthApiError::InvalidCredentials)
            },
        }
    }

    pub async fn user(&self, id: i64) -> Result<Option<User>, AuthApiError> {
        Ok(self.db.fetch_user(id).await?)
    }
}
