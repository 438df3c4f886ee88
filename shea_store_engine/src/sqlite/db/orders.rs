use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderItem, OrderStatusType, TransactionId},
    sqlite::db::{first_row, is_unique_violation},
    traits::PaymentStoreError,
};

/// Inserts a new order with status `Pending`. This is not atomic. You can embed this call inside a transaction if you
/// need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentStoreError> {
    let txid = order.transaction_id.clone();
    let result: Result<Vec<Order>, _> = sqlx::query_as(
        r#"
            INSERT INTO orders (
                user_id,
                status,
                total_amount,
                currency,
                payment_method,
                transaction_id,
                shipping_address,
                billing_address
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(OrderStatusType::Pending)
    .bind(order.total_amount)
    .bind(order.currency)
    .bind(order.payment_method)
    .bind(order.transaction_id)
    .bind(order.shipping_address)
    .bind(order.billing_address)
    .fetch_all(conn)
    .await;
    match result {
        Ok(rows) => Ok(first_row(rows)?),
        Err(e) if is_unique_violation(&e) => Err(PaymentStoreError::DuplicateTransaction(txid)),
        Err(e) => Err(e.into()),
    }
}

/// Copies the user's current cart lines, at current prices, into `order_items` for the given order.
/// Returns the number of items copied.
pub async fn snapshot_cart_into_order(
    order_id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            INSERT INTO order_items (order_id, product_id, quantity, price)
            SELECT $1, cart_items.product_id, cart_items.quantity, products.price
            FROM cart_items JOIN products ON products.id = cart_items.product_id
            WHERE cart_items.user_id = $2
            ORDER BY cart_items.id
        "#,
    )
    .bind(order_id)
    .bind(user_id)
    .execute(conn)
    .await?;
    trace!("🗃️ {} cart lines copied into order #{order_id}", result.rows_affected());
    Ok(result.rows_affected())
}

pub async fn fetch_order_by_transaction_id(
    txid: &TransactionId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE transaction_id = $1").bind(txid.as_str()).fetch_optional(conn).await
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await
}

/// Returns the user's orders, newest first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await
}

/// Moves a `Pending` order to `status`. Returns the updated order, or `None` if no pending order matched, either
/// because there is no such transaction, it belongs to someone other than `owner`, or it has already settled.
pub async fn settle_pending_order(
    txid: &TransactionId,
    status: OrderStatusType,
    payment_status: Option<&str>,
    owner: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let rows: Vec<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = $1,
                payment_status = COALESCE($2, payment_status),
                updated_at = CURRENT_TIMESTAMP
            WHERE transaction_id = $3 AND status = 'pending' AND ($4 IS NULL OR user_id = $4)
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(payment_status)
    .bind(txid.as_str())
    .bind(owner)
    .fetch_all(conn)
    .await?;
    let order = rows.into_iter().next();
    if let Some(o) = &order {
        debug!("🗃️ Order #{} [{txid}] is now {}", o.id, o.status);
    }
    Ok(order)
}
