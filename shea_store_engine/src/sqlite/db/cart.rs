use sqlx::SqliteConnection;

use crate::db_types::{CartItem, CartLine};

/// Adds `quantity` to the (user, product) row, creating it if needed. Returns `None` if the product does not exist or
/// is inactive.
///
/// The product check and the increment are one statement, so the write lock is taken up front and concurrent
/// increments on the same row queue behind each other instead of failing with `SQLITE_BUSY`.
pub async fn upsert_cart_item(
    user_id: i64,
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, sqlx::Error> {
    let rows: Vec<CartItem> = sqlx::query_as(
        r#"
            INSERT INTO cart_items (user_id, product_id, quantity)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM products WHERE id = $2 AND is_active = 1)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = cart_items.quantity + excluded.quantity,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().next())
}

pub async fn update_cart_item(
    user_id: i64,
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, sqlx::Error> {
    let rows: Vec<CartItem> = sqlx::query_as(
        r#"
            UPDATE cart_items SET quantity = $1, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $2 AND product_id = $3
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(user_id)
    .bind(product_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().next())
}

pub async fn delete_cart_item(user_id: i64, product_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Deletes every cart row for the user and returns the number of rows removed.
pub async fn clear_cart(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn fetch_cart_lines(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartLine>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT
                cart_items.product_id,
                cart_items.quantity,
                products.name,
                products.price,
                json_extract(products.images, '$[0]') AS image,
                products.stock
            FROM cart_items
            JOIN products ON products.id = cart_items.product_id
            WHERE cart_items.user_id = $1
            ORDER BY cart_items.id
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}
