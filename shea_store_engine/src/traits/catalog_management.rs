use thiserror::Error;

use crate::db_types::{Category, NewCategory, NewProduct, NewReview, Product, Review};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The category slug '{0}' is already in use")]
    DuplicateSlug(String),
    #[error("Product #{0} does not exist")]
    ProductNotFound(i64),
    #[error("Category #{0} does not exist")]
    CategoryNotFound(i64),
    #[error("Ratings must be between 1 and 5, not {0}")]
    InvalidRating(i64),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Read access to the product catalog, plus the handful of writes needed to stock it.
///
/// Only *active* products and categories are visible through the `fetch_*` methods.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement: Clone {
    /// All active products, in id order.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Active products flagged as featured, in id order, up to `limit` entries.
    async fn fetch_featured_products(&self, limit: i64) -> Result<Vec<Product>, CatalogError>;

    /// The active product with the given id, if there is one.
    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogError>;

    /// Active products in an active category, in id order.
    async fn fetch_products_for_category(&self, category_id: i64) -> Result<Vec<Product>, CatalogError>;

    /// All active categories, ordered by name.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError>;

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogError>;

    /// Number of products in the catalog, active or not.
    async fn count_products(&self) -> Result<i64, CatalogError>;

    async fn insert_category(&self, category: NewCategory) -> Result<Category, CatalogError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogError>;
}

/// Append-only product reviews.
#[allow(async_fn_in_trait)]
pub trait ReviewManagement: Clone {
    /// Reviews for a product, newest first.
    async fn fetch_reviews_for_product(&self, product_id: i64) -> Result<Vec<Review>, CatalogError>;

    /// Stores a review and, in the same atomic transaction, folds its score into the product's running `rating` (to
    /// one decimal place) and increments `review_count`.
    ///
    /// Fails with [`CatalogError::ProductNotFound`] if the product does not exist or is inactive.
    async fn insert_review(&self, user_id: i64, review: NewReview) -> Result<Review, CatalogError>;
}
