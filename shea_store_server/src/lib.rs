//! # Shea Store server
//! This crate hosts the HTTP server for the Shea Store. It is responsible for:
//! Serving the product catalog and product reviews.
//! Registering and logging in customers, and keeping their sessions.
//! Managing each customer's cart.
//! Opening CinetPay payments, and applying the gateway's verdicts to orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/auth/*`: Login, registration, logout and the current user.
//! * `/api/products/*` and `/api/categories/*`: The catalog and its reviews.
//! * `/api/cart/*`: The caller's cart.
//! * `/api/orders/*`: The caller's order history.
//! * `/api/payment/*`: Payment initiation, status polling and the gateway's notification webhook.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod session_reaper;
