use std::fmt::Debug;

use log::*;
use shea_common::{Cents, DEFAULT_CURRENCY};

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, TransactionId, User},
    store_api::{
        errors::OrderFlowError,
        payment_objects::{
            CallbackUrls,
            CheckoutSession,
            NotificationOutcome,
            OrderDetails,
            PaymentNotification,
            PaymentRequest,
            PaymentStatusReport,
            PaymentVerdict,
            DEFAULT_PAYMENT_DESCRIPTION,
            INITIATION_FAILED_MESSAGE,
            TRANSACTION_NOT_FOUND_MESSAGE,
        },
    },
    traits::{GatewayError, GatewayPaymentRequest, PaymentGateway, PaymentManagement},
};

/// `OrderFlowApi` is the primary API for handling the payment flow: opening payments with the gateway, and
/// reconciling orders against what the gateway reports afterwards.
///
/// There are two reconciliation paths. The gateway pushes a notification to the webhook
/// ([`Self::process_notification`]), and the customer's browser polls ([`Self::check_payment_status`]), which asks
/// the gateway directly. Either may arrive first, both may arrive, and either may be repeated. Both end in
/// [`PaymentManagement::settle_order`], which only ever moves a `Pending` order, so the outcome is the same whatever
/// the order of arrival.
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: PaymentManagement,
    G: PaymentGateway,
{
    /// Opens a payment with the gateway on behalf of `customer` and records a `Pending` order for it.
    ///
    /// The order is only written once the gateway has accepted the request. If the gateway declines, times out, or
    /// cannot be reached, no order exists afterwards.
    pub async fn initiate_payment(
        &self,
        customer: &User,
        request: PaymentRequest,
        callbacks: &CallbackUrls,
    ) -> Result<CheckoutSession, OrderFlowError> {
        if request.amount <= 0 {
            return Err(OrderFlowError::InvalidAmount(request.amount));
        }
        let txid = TransactionId::generate();
        let currency = non_empty(request.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let description = non_empty(request.description).unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string());
        let gateway_request = GatewayPaymentRequest {
            transaction_id: txid.clone(),
            amount: request.amount,
            currency: currency.clone(),
            description,
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            customer_phone: non_empty(request.phone),
            notify_url: callbacks.notify_url.clone(),
            return_url: callbacks.return_url.clone(),
        };
        debug!("📦️ Opening payment [{txid}] of {} {currency} for user #{}", request.amount, customer.id);
        let checkout = self.gateway.create_payment(gateway_request).await.map_err(|e| {
            warn!("📦️ Payment [{txid}] could not be opened. {e}");
            match e {
                GatewayError::Rejected { code, message } => {
                    let message = if message.trim().is_empty() { INITIATION_FAILED_MESSAGE.to_string() } else { message };
                    OrderFlowError::GatewayRejected { code, message }
                },
                GatewayError::Timeout(s) => OrderFlowError::GatewayTimeout(s),
                e => OrderFlowError::GatewayUnavailable(e.to_string()),
            }
        })?;
        let order = NewOrder::new(customer.id, Cents::from(request.amount), &currency, txid.clone())
            .with_shipping_address(non_empty(request.shipping_address))
            .with_billing_address(non_empty(request.billing_address));
        let order = self.db.insert_pending_order(order).await.map_err(|e| {
            error!(
                "📦️ The gateway opened payment [{txid}] but the order could not be stored. Any notification for it \
                 will be unmatched. {e}"
            );
            OrderFlowError::from(e)
        })?;
        info!("📦️ Order #{} is pending payment [{txid}]", order.id);
        Ok(CheckoutSession {
            payment_url: checkout.payment_url,
            payment_token: checkout.payment_token,
            transaction_id: txid,
            order_id: order.id,
        })
    }

    /// Applies a gateway notification. Notifications carry no user context, so the order is located by transaction
    /// id alone.
    ///
    /// Unknown transaction ids are not an error: the result is `Applied(Unmatched)` and nothing changes.
    pub async fn process_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<NotificationOutcome, OrderFlowError> {
        let txid = &notification.transaction_id;
        let status = match notification.verdict {
            PaymentVerdict::Accepted => OrderStatusType::Completed,
            PaymentVerdict::Failed => OrderStatusType::Failed,
            PaymentVerdict::Pending => {
                debug!("📦️ Payment [{txid}] is still {}. Nothing to do yet.", notification.gateway_status);
                return Ok(NotificationOutcome::Deferred);
            },
        };
        let result = self.db.settle_order(txid, status, Some(&notification.gateway_status), None).await?;
        log_settlement(txid, &result);
        Ok(NotificationOutcome::Applied(result))
    }

    /// Asks the gateway for the state of `txid` on behalf of `user_id`.
    ///
    /// If the gateway reports the payment as accepted, the caller's order is completed exactly as a notification
    /// would have done. Declined or unknown transactions are reported, never applied.
    pub async fn check_payment_status(
        &self,
        user_id: i64,
        txid: &TransactionId,
    ) -> Result<PaymentStatusReport, OrderFlowError> {
        let status = match self.gateway.check_payment(txid).await {
            Ok(status) => status,
            Err(GatewayError::Rejected { message, .. }) => {
                debug!("📦️ Gateway has no usable status for [{txid}]: {message}");
                let message = if message.trim().is_empty() { TRANSACTION_NOT_FOUND_MESSAGE.to_string() } else { message };
                return Ok(PaymentStatusReport::Unknown { message });
            },
            Err(GatewayError::Timeout(s)) => return Err(OrderFlowError::GatewayTimeout(s)),
            Err(e) => return Err(OrderFlowError::GatewayUnavailable(e.to_string())),
        };
        let settlement = if status.accepted {
            let result =
                self.db.settle_order(txid, OrderStatusType::Completed, Some(&status.status), Some(user_id)).await?;
            log_settlement(txid, &result);
            Some(result)
        } else {
            None
        };
        Ok(PaymentStatusReport::Known {
            status: status.status,
            amount: status.amount,
            currency: status.currency,
            settlement,
        })
    }

    /// The user's orders, newest first.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        Ok(self.db.fetch_orders_for_user(user_id).await?)
    }

    /// The order and its items, if it exists and belongs to `user_id`.
    pub async fn order_for_user(&self, user_id: i64, order_id: i64) -> Result<Option<OrderDetails>, OrderFlowError> {
        let order = match self.db.fetch_order(order_id).await? {
            Some(o) if o.user_id == user_id => o,
            _ => return Ok(None),
        };
        let items = self.db.fetch_order_items(order.id).await?;
        Ok(Some(OrderDetails { order, items }))
    }
}

fn log_settlement(txid: &TransactionId, result: &crate::traits::SettlementResult) {
    use crate::traits::SettlementResult::*;
    match result {
        Settled(order) => info!("📦️ Order #{} [{txid}] settled as {}", order.id, order.status),
        AlreadySettled(order) => debug!("📦️ Order #{} [{txid}] was already {}", order.id, order.status),
        Unmatched => warn!("📦️ No order matches payment [{txid}]. Ignoring it."),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
