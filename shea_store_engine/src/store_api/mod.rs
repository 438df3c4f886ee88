//! # Shea Store public API
//!
//! The `store_api` module exposes the programmatic API of the storefront engine. The API is modular, so that clients
//! can pick the pieces they need, each backed by whichever storage implements the relevant traits.
//!
//! * [`catalog_api`] serves products, categories and reviews, and can seed an empty store with sample data.
//! * [`cart_api`] manages each customer's cart and prices it.
//! * [`auth_api`] registers customers and checks credentials.
//! * [`session_api`] issues, resolves and expires login sessions.
//! * [`order_flow_api`] is the primary API for the payment flow. It opens payments with the gateway, records pending
//!   orders and reconciles them against gateway notifications and status polls.
//!
//! The other submodules in this module are support types.
//!
//! # API usage
//!
//! An API instance is created by supplying a backend that implements the traits the API needs.
//!
//! ```rust,ignore
//! use shea_store_engine::{CartApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/shea_store.db", 5).await?;
//! // SqliteDatabase implements CartManagement
//! let api = CartApi::new(db);
//! let summary = api.summary(user_id).await?;
//! ```

pub mod auth_api;
pub mod cart_api;
pub mod cart_objects;
pub mod catalog_api;
pub mod errors;
pub mod order_flow_api;
pub mod payment_objects;
pub mod sample_data;
pub mod session_api;
