//! `SqliteDatabase` is a concrete implementation of a Shea Store engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the storage traits defined in the [`traits`]
//! module.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{cart, catalog, db_url, is_foreign_key_violation, new_pool, orders, reviews, sessions, users};
use crate::{
    db_types::{
        CartItem,
        CartLine,
        Category,
        NewCategory,
        NewOrder,
        NewProduct,
        NewReview,
        NewSession,
        NewUser,
        Order,
        OrderItem,
        OrderStatusType,
        Product,
        Review,
        Session,
        TransactionId,
        User,
    },
    traits::{
        CartError,
        CartManagement,
        CatalogError,
        CatalogManagement,
        PaymentManagement,
        PaymentStoreError,
        ReviewManagement,
        SessionError,
        SessionManagement,
        SettlementResult,
        UserError,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_active_products(&mut conn).await?)
    }

    async fn fetch_featured_products(&self, limit: i64) -> Result<Vec<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_featured_products(limit, &mut conn).await?)
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_product(id, &mut conn).await?)
    }

    async fn fetch_products_for_category(&self, category_id: i64) -> Result<Vec<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_products_for_category(category_id, &mut conn).await?)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_categories(&mut conn).await?)
    }

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_category(id, &mut conn).await?)
    }

    async fn count_products(&self) -> Result<i64, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::count_products(&mut conn).await?)
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let category = catalog::insert_category(category, &mut tx).await?;
        tx.commit().await?;
        Ok(category)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let category_id = product.category_id;
        let product = catalog::insert_product(product, &mut tx).await.map_err(|e| match category_id {
            Some(id) if is_foreign_key_violation(&e) => CatalogError::CategoryNotFound(id),
            _ => CatalogError::from(e),
        })?;
        tx.commit().await?;
        Ok(product)
    }
}

impl ReviewManagement for SqliteDatabase {
    async fn fetch_reviews_for_product(&self, product_id: i64) -> Result<Vec<Review>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(reviews::fetch_reviews_for_product(product_id, &mut conn).await?)
    }

    async fn insert_review(&self, user_id: i64, review: NewReview) -> Result<Review, CatalogError> {
        if !(1..=5).contains(&review.rating) {
            return Err(CatalogError::InvalidRating(review.rating));
        }
        let product_id = review.product_id;
        let score = review.rating;
        // The insert is the first statement, so the transaction holds the write lock before it reads anything
        let mut tx = self.pool.begin().await?;
        let review = reviews::insert_review(user_id, review, &mut tx)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))?;
        catalog::add_rating_to_product(product_id, score, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Review #{} for product #{product_id} stored and product rating updated", review.id);
        Ok(review)
    }
}

impl CartManagement for SqliteDatabase {
    async fn add_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let mut conn = self.pool.acquire().await?;
        let item = cart::upsert_cart_item(user_id, product_id, quantity, &mut conn)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        trace!("🗃️ Cart of user #{user_id} holds {} of product #{product_id}", item.quantity);
        Ok(item)
    }

    async fn update_cart_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let mut tx = self.pool.begin().await?;
        let item = cart::update_cart_item(user_id, product_id, quantity, &mut tx).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn remove_cart_item(&self, user_id: i64, product_id: i64) -> Result<bool, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::delete_cart_item(user_id, product_id, &mut conn).await?)
    }

    async fn clear_cart(&self, user_id: i64) -> Result<bool, CartError> {
        let mut conn = self.pool.acquire().await?;
        let removed = cart::clear_cart(user_id, &mut conn).await?;
        Ok(removed > 0)
    }

    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::fetch_cart_lines(user_id, &mut conn).await?)
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<User, UserError> {
        let mut tx = self.pool.begin().await?;
        let user = users::insert_user(user, &mut tx).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, UserError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_id(id, &mut conn).await?)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_email(email, &mut conn).await?)
    }
}

impl SessionManagement for SqliteDatabase {
    async fn create_session(&self, session: NewSession) -> Result<Session, SessionError> {
        let mut tx = self.pool.begin().await?;
        let session = sessions::insert_session(session, &mut tx).await?;
        tx.commit().await?;
        Ok(session)
    }

    async fn fetch_session(&self, key: &str) -> Result<Option<Session>, SessionError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::fetch_live_session(key, &mut conn).await?)
    }

    async fn destroy_session(&self, key: &str) -> Result<bool, SessionError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::delete_session(key, &mut conn).await?)
    }

    async fn purge_expired_sessions(&self) -> Result<u64, SessionError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::delete_expired_sessions(&mut conn).await?)
    }
}

impl PaymentManagement for SqliteDatabase {
    async fn insert_pending_order(&self, order: NewOrder) -> Result<Order, PaymentStoreError> {
        let mut tx = self.pool.begin().await?;
        let user_id = order.user_id;
        let order = orders::insert_order(order, &mut tx).await?;
        let items = orders::snapshot_cart_into_order(order.id, user_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Pending order #{} [{}] stored with {items} items", order.id, order.transaction_id);
        Ok(order)
    }

    async fn fetch_order_by_transaction_id(&self, txid: &TransactionId) -> Result<Option<Order>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_transaction_id(txid, &mut conn).await?)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(id, &mut conn).await?)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_user(user_id, &mut conn).await?)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_items(order_id, &mut conn).await?)
    }

    async fn settle_order(
        &self,
        txid: &TransactionId,
        status: OrderStatusType,
        payment_status: Option<&str>,
        owner: Option<i64>,
    ) -> Result<SettlementResult, PaymentStoreError> {
        if !status.is_terminal() {
            return Err(PaymentStoreError::InvalidSettlement(status));
        }
        let mut tx = self.pool.begin().await?;
        let result = match orders::settle_pending_order(txid, status, payment_status, owner, &mut tx).await? {
            Some(order) => {
                if order.status == OrderStatusType::Completed {
                    let cleared = cart::clear_cart(order.user_id, &mut tx).await?;
                    debug!("🗃️ Order #{} paid. {cleared} items cleared from user #{}'s cart", order.id, order.user_id);
                }
                SettlementResult::Settled(order)
            },
            None => match orders::fetch_order_by_transaction_id(txid, &mut tx).await? {
                Some(order) if owner.map_or(true, |u| u == order.user_id) => {
                    trace!("🗃️ Order #{} [{txid}] had already settled as {}", order.id, order.status);
                    SettlementResult::AlreadySettled(order)
                },
                _ => SettlementResult::Unmatched,
            },
        };
        tx.commit().await?;
        Ok(result)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. The migrations are embedded in the binary.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// The URL of the database
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}
