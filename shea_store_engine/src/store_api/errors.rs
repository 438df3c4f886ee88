use thiserror::Error;

use crate::{
    db_types::TransactionId,
    helpers::PasswordHashError,
    traits::{PaymentStoreError, SessionError, UserError},
};

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Deliberately says nothing about whether the email exists.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with email {0} already exists")]
    EmailAlreadyExists(String),
    #[error("{0}")]
    PasswordHashError(#[from] PasswordHashError),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

impl From<UserError> for AuthApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::DatabaseError(s) => Self::DatabaseError(s),
            UserError::EmailAlreadyExists(email) => Self::EmailAlreadyExists(email),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Payment amounts must be positive, not {0}")]
    InvalidAmount(i64),
    /// The gateway refused to open the payment. Business failure, not a fault.
    #[error("{message}")]
    GatewayRejected { code: String, message: String },
    /// Nothing is known about the outcome. The caller may try again.
    #[error("The payment gateway timed out: {0}")]
    GatewayTimeout(String),
    #[error("The payment gateway is unavailable: {0}")]
    GatewayUnavailable(String),
    #[error("Transaction {0} is already in use")]
    DuplicateTransaction(TransactionId),
}

impl From<PaymentStoreError> for OrderFlowError {
    fn from(e: PaymentStoreError) -> Self {
        match e {
            PaymentStoreError::DuplicateTransaction(txid) => Self::DuplicateTransaction(txid),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}
