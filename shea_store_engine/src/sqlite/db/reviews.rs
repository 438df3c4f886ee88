use sqlx::SqliteConnection;

use crate::db_types::{NewReview, Review};

/// Stores a review for an active product. Returns `None`, and writes nothing, if the product does not exist or is
/// inactive.
pub async fn insert_review(
    user_id: i64,
    review: NewReview,
    conn: &mut SqliteConnection,
) -> Result<Option<Review>, sqlx::Error> {
    let rows: Vec<Review> = sqlx::query_as(
        r#"
            INSERT INTO reviews (user_id, product_id, rating, comment)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM products WHERE id = $2 AND is_active = 1)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(review.product_id)
    .bind(review.rating)
    .bind(review.comment)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().next())
}

pub async fn fetch_reviews_for_product(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(product_id)
        .fetch_all(conn)
        .await
}
