use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CartItem, CartLine},
    store_api::cart_objects::CartSummary,
    traits::{CartError, CartManagement},
};

/// `CartApi` manages the per-user shopping cart.
///
/// A cart holds at most one line per product. Adding a product that is already present increases that line's
/// quantity. Quantities are always at least one; a line is removed rather than set to zero.
pub struct CartApi<B> {
    db: B,
}

impl<B: Debug> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.db)
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn add_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let item = self.db.add_cart_item(user_id, product_id, quantity).await?;
        debug!("🛒️ User #{user_id} now has {} of product #{product_id}", item.quantity);
        Ok(item)
    }

    /// Sets the quantity of an existing line. Returns `None` if the product is not in the cart.
    pub async fn update_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        self.db.update_cart_item(user_id, product_id, quantity).await
    }

    /// Returns `false` if there was nothing to remove.
    pub async fn remove_item(&self, user_id: i64, product_id: i64) -> Result<bool, CartError> {
        self.db.remove_cart_item(user_id, product_id).await
    }

    pub async fn clear(&self, user_id: i64) -> Result<bool, CartError> {
        let cleared = self.db.clear_cart(user_id).await?;
        if cleared {
            debug!("🛒️ Cleared cart for user #{user_id}");
        }
        Ok(cleared)
    }

    /// The cart's lines joined with current product details, oldest line first.
    pub async fn items(&self, user_id: i64) -> Result<Vec<CartLine>, CartError> {
        self.db.fetch_cart(user_id).await
    }

    pub async fn summary(&self, user_id: i64) -> Result<CartSummary, CartError> {
        let lines = self.db.fetch_cart(user_id).await?;
        Ok(CartSummary::from_lines(&lines))
    }
}
