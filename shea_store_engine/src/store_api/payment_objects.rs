use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, OrderItem, TransactionId},
    traits::SettlementResult,
};

pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Achat de produits de karité";
pub const INITIATION_FAILED_MESSAGE: &str = "Erreur lors de l'initialisation du paiement";
pub const TRANSACTION_NOT_FOUND_MESSAGE: &str = "Transaction non trouvée";

/// A customer's request to pay for their cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Integer amount in minor units.
    pub amount: i64,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: i64) -> Self {
        Self { amount, ..Default::default() }
    }

    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Where the gateway should post notifications and where it should send the customer afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackUrls {
    pub notify_url: String,
    pub return_url: String,
}

impl CallbackUrls {
    /// Builds the storefront's callback URLs from its public base URL, e.g. `https://shop.example.com`.
    pub fn from_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self { notify_url: format!("{base}/api/payment/notify"), return_url: format!("{base}/payment/success") }
    }
}

/// Returned to the customer once the gateway has opened the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub payment_url: String,
    pub payment_token: String,
    pub transaction_id: TransactionId,
    pub order_id: i64,
}

/// What a gateway notification says about a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentVerdict {
    Accepted,
    /// The customer has not finished yet. No final outcome.
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub transaction_id: TransactionId,
    pub verdict: PaymentVerdict,
    /// The gateway's own wording for the status, e.g. `ACCEPTED` or `REFUSED`.
    pub gateway_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NotificationOutcome {
    Applied(SettlementResult),
    /// The notification carried no final verdict, so nothing was applied.
    Deferred,
}

/// The answer to a customer's status poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaymentStatusReport {
    Known {
        status: String,
        amount: i64,
        currency: String,
        /// Set when the poll found an accepted payment and reconciled the order against it.
        settlement: Option<SettlementResult>,
    },
    Unknown {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
