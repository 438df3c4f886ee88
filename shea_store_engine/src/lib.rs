//! Shea Store Engine
//!
//! The Shea Store engine holds the core logic of a small storefront: catalog, carts, customer accounts, sessions, and
//! an order flow that takes payments through an external gateway. It is provider-agnostic; the gateway is reached
//! through the [`PaymentGateway`] trait.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`traits`] and the SQLite backend). Each concern is a trait, and [`SqliteDatabase`] implements all of
//!    them. You should rarely need to touch the database directly. The exception is the data types, which are
//!    defined in [`db_types`] and are public.
//! 2. The public API ([`mod@store_api`]). This provides the functionality of the store: browsing the catalog,
//!    managing carts, registering and logging customers in, and opening and reconciling payments.
pub mod db_types;
pub mod helpers;
pub mod session_stores;
pub mod store_api;
pub mod traits;

mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use session_stores::{MemorySessionStore, SessionStore};
pub use sqlite::{db::db_url, SqliteDatabase};
pub use store_api::{
    auth_api::AuthApi,
    cart_api::CartApi,
    cart_objects,
    catalog_api::CatalogApi,
    errors::{AuthApiError, OrderFlowError},
    order_flow_api::OrderFlowApi,
    payment_objects,
    session_api::SessionApi,
};
pub use traits::*;
