use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::TransactionId;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway answered, and said no. This is a business outcome, not a fault.
    #[error("Payment declined by the gateway ({code}): {message}")]
    Rejected { code: String, message: String },
    #[error("The payment gateway timed out: {0}")]
    Timeout(String),
    #[error("The payment gateway could not be reached: {0}")]
    Transport(String),
    #[error("The payment gateway sent an unexpected response: {0}")]
    InvalidResponse(String),
}

/// Everything a gateway needs to open a hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPaymentRequest {
    pub transaction_id: TransactionId,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    /// `None` when the customer did not give one. Gateways that insist on a number substitute their own.
    pub customer_phone: Option<String>,
    pub notify_url: String,
    pub return_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCheckout {
    pub payment_url: String,
    pub payment_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPaymentStatus {
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub accepted: bool,
}

/// An outbound payment provider.
///
/// Implementations must bound the time they spend waiting on the provider and report an expired wait as
/// [`GatewayError::Timeout`].
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    async fn create_payment(&self, request: GatewayPaymentRequest) -> Result<GatewayCheckout, GatewayError>;

    async fn check_payment(&self, txid: &TransactionId) -> Result<GatewayPaymentStatus, GatewayError>;
}
