use cucumber::{then, when};
use shea_common::Cents;
use shea_store_engine::{
    db_types::OrderStatusType,
    payment_objects::{CallbackUrls, PaymentNotification, PaymentRequest, PaymentVerdict},
    PaymentManagement,
};

use crate::cucumber::StoreWorld;

#[when(expr = "'{word}' adds {int} of '{word}' to their cart")]
async fn add_to_cart(world: &mut StoreWorld, customer: String, quantity: i64, product: String) {
    let user = world.user(&customer);
    let product = world.product(&product);
    world.cart_api().add_item(user.id, product, quantity).await.expect("Error adding to cart");
}

#[when(expr = "'{word}' checks out for {int}")]
async fn check_out(world: &mut StoreWorld, customer: String, amount: i64) {
    let user = world.user(&customer);
    let callbacks = CallbackUrls::from_base_url("http://localhost:8360");
    let result = world.order_api().initiate_payment(&user, PaymentRequest::new(amount), &callbacks).await;
    world.system_mut().last_checkout = result.ok();
}

#[when(expr = "the gateway reports the last payment as {word}")]
async fn gateway_notifies(world: &mut StoreWorld, status: String) {
    let verdict = match status.as_str() {
        "ACCEPTED" => PaymentVerdict::Accepted,
        "PENDING" | "WAITING_FOR_CUSTOMER" => PaymentVerdict::Pending,
        _ => PaymentVerdict::Failed,
    };
    let transaction_id = world.last_checkout().transaction_id.clone();
    let notification = PaymentNotification { transaction_id, verdict, gateway_status: status };
    world.order_api().process_notification(notification).await.expect("Error processing notification");
}

#[then(expr = "the cart of '{word}' has subtotal {word}, shipping {word} and total {word}")]
async fn cart_totals(world: &mut StoreWorld, customer: String, subtotal: String, shipping: String, total: String) {
    let user = world.user(&customer);
    let summary = world.cart_api().summary(user.id).await.expect("Error fetching cart summary");
    assert_eq!(summary.subtotal, subtotal.parse::<Cents>().unwrap(), "subtotal");
    assert_eq!(summary.shipping, shipping.parse::<Cents>().unwrap(), "shipping");
    assert_eq!(summary.total, total.parse::<Cents>().unwrap(), "total");
}

#[then(expr = "the cart of '{word}' is empty")]
async fn cart_is_empty(world: &mut StoreWorld, customer: String) {
    let user = world.user(&customer);
    let items = world.cart_api().items(user.id).await.expect("Error fetching cart");
    assert!(items.is_empty(), "Cart still holds {items:?}");
}

#[then(expr = "the cart of '{word}' holds {int} items")]
async fn cart_holds(world: &mut StoreWorld, customer: String, count: i64) {
    let user = world.user(&customer);
    let summary = world.cart_api().summary(user.id).await.expect("Error fetching cart summary");
    assert_eq!(summary.item_count, count);
}

#[then(expr = "the last order is {word}")]
async fn last_order_status(world: &mut StoreWorld, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Not an order status");
    let txid = &world.last_checkout().transaction_id;
    let order = world.system().db.fetch_order_by_transaction_id(txid).await.expect("Error fetching order");
    let order = order.expect("The order does not exist");
    assert_eq!(order.status, expected);
}

#[then(expr = "'{word}' has {int} orders")]
async fn order_count(world: &mut StoreWorld, customer: String, count: usize) {
    let user = world.user(&customer);
    let orders = world.order_api().orders_for_user(user.id).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}
