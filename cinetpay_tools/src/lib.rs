//! A small client for the CinetPay hosted-checkout API.
//!
//! [`CinetPayApi`] wraps the two calls a merchant backend needs: opening a payment
//! ([`CinetPayApi::initiate_payment`]) and asking the gateway for the current state of a transaction
//! ([`CinetPayApi::check_payment`]). Webhook notifications arrive as [`NotificationPayload`]s, which can be
//! authenticated with [`verify_x_token`].
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::CinetPayApi;
pub use config::CinetPayConfig;
pub use data_objects::{
    NewPayment,
    NotificationPayload,
    PaymentLink,
    PaymentStatus,
    ResponseEnvelope,
    CHECK_SUCCESS_CODE,
    INIT_SUCCESS_CODE,
};
pub use error::CinetPayError;
pub use helpers::{calculate_hmac, split_customer_name, verify_x_token};
