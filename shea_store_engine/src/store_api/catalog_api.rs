use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Category, NewReview, Product, Review},
    store_api::sample_data::{sample_categories, sample_products},
    traits::{CatalogError, CatalogManagement, ReviewManagement},
};

/// Number of products shown on the storefront's home page.
pub const FEATURED_LIMIT: i64 = 8;

/// `CatalogApi` serves the product catalog and its reviews.
pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.db.fetch_products().await
    }

    pub async fn featured_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.db.fetch_featured_products(FEATURED_LIMIT).await
    }

    /// The active product with the given id. Inactive products are treated as missing.
    pub async fn product(&self, id: i64) -> Result<Option<Product>, CatalogError> {
        self.db.fetch_product(id).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.db.fetch_categories().await
    }

    /// Active products in the given category. A category that does not exist is an error, whereas an existing but
    /// empty category yields an empty list.
    pub async fn products_in_category(&self, category_id: i64) -> Result<Vec<Product>, CatalogError> {
        match self.db.fetch_category(category_id).await? {
            Some(_) => self.db.fetch_products_for_category(category_id).await,
            None => Err(CatalogError::CategoryNotFound(category_id)),
        }
    }

    /// Loads the demonstration catalog, but only into a store that has no products at all. Returns the number of
    /// products inserted.
    pub async fn seed_sample_data(&self) -> Result<usize, CatalogError> {
        let existing = self.db.count_products().await?;
        if existing > 0 {
            debug!("🗃️ Catalog already holds {existing} products. Not seeding.");
            return Ok(0);
        }
        let mut category_ids = Vec::new();
        for category in sample_categories() {
            let category = self.db.insert_category(category).await?;
            category_ids.push(category.id);
        }
        let mut count = 0;
        for sample in sample_products() {
            let mut product = sample.product;
            if let Some(id) = category_ids.get(sample.category) {
                product = product.in_category(*id);
            }
            self.db.insert_product(product).await?;
            count += 1;
        }
        info!("🗃️ Seeded the catalog with {} categories and {count} products", category_ids.len());
        Ok(count)
    }
}

impl<B> CatalogApi<B>
where B: ReviewManagement
{
    pub async fn reviews(&self, product_id: i64) -> Result<Vec<Review>, CatalogError> {
        self.db.fetch_reviews_for_product(product_id).await
    }

    /// Posts a review on behalf of `user_id`. The product's rating and review count move with it.
    pub async fn add_review(&self, user_id: i64, review: NewReview) -> Result<Review, CatalogError> {
        if !(1..=5).contains(&review.rating) {
            return Err(CatalogError::InvalidRating(review.rating));
        }
        let review = self.db.insert_review(user_id, review).await?;
        debug!("🗃️ User #{user_id} reviewed product #{} ({}/5)", review.product_id, review.rating);
        Ok(review)
    }
}
