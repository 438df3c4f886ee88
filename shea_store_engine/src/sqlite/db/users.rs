use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    sqlite::db::{first_row, is_unique_violation},
    traits::UserError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, UserError> {
    let email = user.email.clone();
    let result: Result<Vec<User>, _> = sqlx::query_as(
        r#"
            INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .fetch_all(conn)
    .await;
    match result {
        Ok(rows) => first_row(rows).map_err(UserError::from),
        Err(e) if is_unique_violation(&e) => {
            debug!("🗃️ Registration for {email} rejected. The address is taken.");
            Err(UserError::EmailAlreadyExists(email))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await
}
