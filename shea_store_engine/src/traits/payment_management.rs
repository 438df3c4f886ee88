use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderItem, OrderStatusType, TransactionId},
    traits::data_objects::SettlementResult,
};

#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("An order with transaction id {0} already exists")]
    DuplicateTransaction(TransactionId),
    #[error("Orders can only settle as completed or failed, not {0}")]
    InvalidSettlement(OrderStatusType),
}

impl From<sqlx::Error> for PaymentStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Order storage for the payment flow.
///
/// Orders are the audit trail of payment attempts. They are created `Pending` when a payment is opened with the
/// gateway, and settle exactly once, as `Completed` or `Failed`.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement: Clone {
    /// In a single atomic transaction:
    /// * stores `order` with status `Pending`,
    /// * snapshots the owner's current cart into `order_items`.
    ///
    /// The cart itself is left untouched. It is only cleared when the payment succeeds.
    async fn insert_pending_order(&self, order: NewOrder) -> Result<Order, PaymentStoreError>;

    /// Looks an order up through the unique transaction id index.
    async fn fetch_order_by_transaction_id(&self, txid: &TransactionId) -> Result<Option<Order>, PaymentStoreError>;

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, PaymentStoreError>;

    /// The user's orders, newest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, PaymentStoreError>;

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, PaymentStoreError>;

    /// Settles the pending order with the given transaction id. In a single atomic transaction:
    /// * the order moves from `Pending` to `status`, and `payment_status` records the gateway's wording,
    /// * if the new status is `Completed`, the owner's cart is cleared.
    ///
    /// If `owner` is given, only an order belonging to that user is considered.
    ///
    /// The transition is guarded on the order still being `Pending`, so settling twice is harmless: the second call
    /// changes nothing, clears nothing, and returns [`SettlementResult::AlreadySettled`]. If no (visible) order has
    /// this transaction id, [`SettlementResult::Unmatched`] is returned.
    async fn settle_order(
        &self,
        txid: &TransactionId,
        status: OrderStatusType,
        payment_status: Option<&str>,
        owner: Option<i64>,
    ) -> Result<SettlementResult, PaymentStoreError>;
}
