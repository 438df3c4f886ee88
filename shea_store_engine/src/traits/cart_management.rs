use thiserror::Error;

use crate::db_types::{CartItem, CartLine};

#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product #{0} does not exist")]
    ProductNotFound(i64),
    #[error("Quantities must be at least 1, not {0}")]
    InvalidQuantity(i64),
}

impl From<sqlx::Error> for CartError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Per-user cart storage. Every method is a single atomic operation against the backend.
#[allow(async_fn_in_trait)]
pub trait CartManagement: Clone {
    /// Adds `quantity` units of a product to the user's cart.
    ///
    /// There is at most one row per (user, product) pair. If the pair already exists, its quantity is incremented by
    /// `quantity` in the same statement, so concurrent calls never lose an increment.
    ///
    /// Fails with [`CartError::ProductNotFound`] if the product does not exist or is inactive.
    async fn add_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, CartError>;

    /// Replaces the quantity of an existing cart row. Returns `None` if the user has no such item.
    async fn update_cart_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartError>;

    /// Returns whether a row was deleted.
    async fn remove_cart_item(&self, user_id: i64, product_id: i64) -> Result<bool, CartError>;

    /// Empties the cart. Returns whether any row was deleted.
    async fn clear_cart(&self, user_id: i64) -> Result<bool, CartError>;

    /// The user's cart, joined with product name, price, lead image and stock.
    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartError>;
}
