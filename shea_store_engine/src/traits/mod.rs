//! # Storage and provider contracts
//!
//! This module defines the behaviour that backends must expose to act as storage for the Shea Store engine, and the
//! contract for outbound payment providers.
//!
//! * [`CatalogManagement`] and [`ReviewManagement`] cover products, categories and reviews.
//! * [`CartManagement`] holds each user's cart.
//! * [`UserManagement`] stores accounts and [`SessionManagement`] stores login sessions.
//! * [`PaymentManagement`] stores orders and applies payment verdicts to them.
//! * [`PaymentGateway`] is the outbound payment provider (e.g. CinetPay).
mod cart_management;
mod catalog_management;
mod payment_gateway;
mod payment_management;
mod session_management;
mod user_management;

mod data_objects;

pub use cart_management::{CartError, CartManagement};
pub use catalog_management::{CatalogError, CatalogManagement, ReviewManagement};
pub use data_objects::SettlementResult;
pub use payment_gateway::{GatewayCheckout, GatewayError, GatewayPaymentRequest, GatewayPaymentStatus, PaymentGateway};
pub use payment_management::{PaymentManagement, PaymentStoreError};
pub use session_management::{SessionError, SessionManagement};
pub use user_management::{UserError, UserManagement};
