use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{Category, NewCategory, NewProduct, Product},
    sqlite::db::{first_row, is_unique_violation},
    traits::CatalogError,
};

pub async fn fetch_active_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE is_active = 1 ORDER BY id").fetch_all(conn).await
}

pub async fn fetch_featured_products(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE is_active = 1 AND is_featured = 1 ORDER BY id LIMIT $1")
        .bind(limit)
        .fetch_all(conn)
        .await
}

/// Fetches an active product.
pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1 AND is_active = 1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_products_for_category(
    category_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT products.* FROM products
            JOIN categories ON categories.id = products.category_id
            WHERE products.category_id = $1 AND products.is_active = 1 AND categories.is_active = 1
            ORDER BY products.id
        "#,
    )
    .bind(category_id)
    .fetch_all(conn)
    .await
}

pub async fn count_products(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(conn).await?;
    Ok(count.0)
}

pub async fn fetch_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE is_active = 1 ORDER BY name").fetch_all(conn).await
}

pub async fn fetch_category(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND is_active = 1").bind(id).fetch_optional(conn).await
}

pub async fn insert_category(category: NewCategory, conn: &mut SqliteConnection) -> Result<Category, CatalogError> {
    let slug = category.slug.clone();
    let result: Result<Vec<Category>, _> =
        sqlx::query_as("INSERT INTO categories (name, slug, description) VALUES ($1, $2, $3) RETURNING *;")
            .bind(category.name)
            .bind(category.slug)
            .bind(category.description)
            .fetch_all(conn)
            .await;
    match result {
        Ok(rows) => Ok(first_row(rows)?),
        Err(e) if is_unique_violation(&e) => Err(CatalogError::DuplicateSlug(slug)),
        Err(e) => Err(e.into()),
    }
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let rows: Vec<Product> = sqlx::query_as(
        r#"
            INSERT INTO products (
                name,
                description,
                price,
                original_price,
                stock,
                category_id,
                images,
                rating,
                review_count,
                is_featured
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.stock)
    .bind(product.category_id)
    .bind(Json(product.images))
    .bind(product.rating)
    .bind(product.review_count)
    .bind(product.is_featured)
    .fetch_all(conn)
    .await?;
    let product = first_row(rows)?;
    debug!("🗃️ Product '{}' inserted with id {}", product.name, product.id);
    Ok(product)
}

/// Folds a new review score into the product's running `rating` (one decimal place) and bumps `review_count`.
///
/// The update is incremental so that aggregates imported with the catalog are preserved.
pub async fn add_rating_to_product(product_id: i64, rating: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            UPDATE products SET
                rating = ROUND((rating * review_count + $2) / (review_count + 1.0), 1),
                review_count = review_count + 1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
        "#,
    )
    .bind(product_id)
    .bind(rating)
    .execute(conn)
    .await?;
    Ok(())
}
