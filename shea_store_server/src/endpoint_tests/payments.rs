use actix_web::{http::StatusCode, test::TestRequest, web};
use cinetpay_tools::{calculate_hmac, NotificationPayload};
use serde_json::json;
use shea_common::{Cents, Secret};
use shea_store_engine::{
    db_types::{NewCategory, NewOrder, NewProduct, OrderStatusType, TransactionId, User},
    traits::{
        CatalogManagement,
        GatewayCheckout,
        GatewayError,
        GatewayPaymentStatus,
        PaymentManagement,
    },
    AuthApi,
    CartApi,
    OrderFlowApi,
    SqliteDatabase,
};

use super::{
    helpers::{login_as, memory_sessions, new_database, send, Sessions},
    mocks::MockGateway,
};
use crate::{
    config::NotificationAuth,
    routes::{InitiatePaymentRoute, MyOrdersRoute, OrderByIdRoute, PaymentNotificationRoute, PaymentStatusRoute},
};

const SECRET: &str = "s3cr3t";

struct Shop {
    db: SqliteDatabase,
    user: User,
    sessions: Sessions,
    cookie: actix_web::cookie::Cookie<'static>,
}

/// A store with one customer, logged in, holding 3 × a 10.00 product in their cart.
async fn shop() -> Shop {
    let _ = env_logger::try_init().ok();
    let db = new_database().await;
    let user = AuthApi::new(db.clone()).register("Awa Traoré", "awa@example.com", "secret1").await.unwrap();
    let category = db.insert_category(NewCategory::new("Beurres", "beurres")).await.unwrap();
    let product =
        db.insert_product(NewProduct::new("Beurre A", Cents::from(1000)).with_stock(10).in_category(category.id)).await;
    CartApi::new(db.clone()).add_item(user.id, product.unwrap().id, 3).await.unwrap();
    let sessions = memory_sessions();
    let cookie = login_as(&sessions, user.id).await;
    Shop { db, user, sessions, cookie }
}

fn payment_routes(db: SqliteDatabase, gateway: MockGateway) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let auth = NotificationAuth { hmac_checks: true, secret_key: Secret::new(SECRET.to_string()) };
        cfg.app_data(web::Data::new(AuthApi::new(db.clone())))
            .app_data(web::Data::new(OrderFlowApi::new(db, gateway)))
            .app_data(web::Data::new(auth))
            .service(
                web::scope("/payment/notify").service(PaymentNotificationRoute::<SqliteDatabase, MockGateway>::new()),
            )
            .service(InitiatePaymentRoute::<SqliteDatabase, SqliteDatabase, MockGateway>::new())
            .service(PaymentStatusRoute::<SqliteDatabase, MockGateway>::new())
            .service(MyOrdersRoute::<SqliteDatabase, MockGateway>::new())
            .service(OrderByIdRoute::<SqliteDatabase, MockGateway>::new());
    }
}

async fn pending_order(shop: &Shop, txid: &str) -> i64 {
    let txid = txid.parse::<TransactionId>().unwrap();
    let order = NewOrder::new(shop.user.id, Cents::from(3500), "XOF", txid);
    shop.db.insert_pending_order(order).await.unwrap().id
}

fn notification(txid: &str, result: &str, status: &str) -> NotificationPayload {
    NotificationPayload {
        cpm_site_id: "445160".into(),
        cpm_trans_id: txid.into(),
        cpm_amount: "3500".into(),
        cpm_currency: "XOF".into(),
        cpm_result: result.into(),
        cpm_trans_status: status.into(),
        ..Default::default()
    }
}

fn signed(payload: &NotificationPayload) -> TestRequest {
    let token = calculate_hmac(SECRET, payload.x_token_data().as_bytes());
    TestRequest::post().uri("/payment/notify").insert_header(("x-token", token)).set_form(payload)
}

async fn order_status(shop: &Shop, order_id: i64) -> OrderStatusType {
    shop.db.fetch_order(order_id).await.unwrap().unwrap().status
}

#[actix_web::test]
async fn initiate_payment_opens_a_pending_order() {
    let shop = shop().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_payment().times(1).returning(|req| {
        assert_eq!(req.amount, 3500);
        assert_eq!(req.currency, "XOF");
        assert_eq!(req.customer_email, "awa@example.com");
        assert_eq!(req.customer_phone, None);
        assert_eq!(req.notify_url, "http://boutique.example.com/api/payment/notify");
        assert_eq!(req.return_url, "http://boutique.example.com/payment/success");
        Ok(GatewayCheckout {
            payment_url: "https://checkout.cinetpay.com/payment/tok_1".into(),
            payment_token: "tok_1".into(),
        })
    });
    let req = TestRequest::post()
        .uri("/payment/initiate")
        .insert_header(("Host", "boutique.example.com"))
        .cookie(shop.cookie.clone())
        .set_json(json!({"amount": 3500}));
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["payment_token"], "tok_1");
    assert!(body["transaction_id"].as_str().unwrap().starts_with("TXN_"));
    let order_id = body["order_id"].as_i64().unwrap();
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Pending);
    let items = shop.db.fetch_order_items(order_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 3);
}

#[actix_web::test]
async fn declined_payments_leave_no_order() {
    let shop = shop().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_payment().returning(|_| {
        Err(GatewayError::Rejected { code: "608".into(), message: "MINIMUM_REQUIRED_FIELDS".into() })
    });
    let req = TestRequest::post().uri("/payment/initiate").cookie(shop.cookie.clone()).set_json(json!({"amount": 3500}));
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["message"], "MINIMUM_REQUIRED_FIELDS");
    assert!(shop.db.fetch_orders_for_user(shop.user.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn gateway_faults_have_their_own_status_codes() {
    let shop = shop().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_payment().returning(|_| Err(GatewayError::Timeout("15s elapsed".into())));
    let req = || TestRequest::post().uri("/payment/initiate").cookie(shop.cookie.clone()).set_json(json!({"amount": 3500}));
    let res = send(req(), shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::GATEWAY_TIMEOUT);

    let mut gateway = MockGateway::new();
    gateway.expect_create_payment().returning(|_| Err(GatewayError::Transport("connection refused".into())));
    let res = send(req(), shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert!(shop.db.fetch_orders_for_user(shop.user.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn initiate_payment_checks_its_input() {
    let shop = shop().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_payment().never();
    let req = TestRequest::post().uri("/payment/initiate").cookie(shop.cookie.clone()).set_json(json!({"amount": 0}));
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["errors"][0]["field"], "amount");

    let req = TestRequest::post().uri("/payment/initiate").set_json(json!({"amount": 3500}));
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn accepted_notification_completes_the_order() {
    let shop = shop().await;
    let txid = "TXN_1700000000000_0a1b2c3d";
    let order_id = pending_order(&shop, txid).await;
    let payload = notification(txid, "00", "ACCEPTED");
    let res = send(signed(&payload), shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "OK");
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Completed);
    assert!(CartApi::new(shop.db.clone()).items(shop.user.id).await.unwrap().is_empty());

    // A repeat delivery is acknowledged and changes nothing
    let res = send(signed(&payload), shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.body, "OK");
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Completed);
}

#[actix_web::test]
async fn refused_and_pending_notifications() {
    let shop = shop().await;
    let txid = "TXN_1700000000000_11111111";
    let order_id = pending_order(&shop, txid).await;
    let waiting = notification(txid, "00", "WAITING_FOR_CUSTOMER");
    let res = send(signed(&waiting), shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.body, "OK");
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Pending);

    let refused = notification(txid, "627", "REFUSED");
    let res = send(signed(&refused), shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.body, "OK");
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Failed);
    assert_eq!(CartApi::new(shop.db.clone()).items(shop.user.id).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn forged_notifications_are_refused() {
    let shop = shop().await;
    let txid = "TXN_1700000000000_22222222";
    let order_id = pending_order(&shop, txid).await;
    let payload = notification(txid, "00", "ACCEPTED");
    let req = TestRequest::post().uri("/payment/notify").insert_header(("x-token", "deadbeef")).set_form(&payload);
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let unsigned = TestRequest::post().uri("/payment/notify").set_form(&payload);
    let res = send(unsigned, shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Pending);
}

#[actix_web::test]
async fn unmatched_notifications_are_acknowledged() {
    let shop = shop().await;
    let payload = notification("TXN_1700000000000_ffffffff", "00", "ACCEPTED");
    let res = send(signed(&payload), shop.sessions.clone(), payment_routes(shop.db.clone(), MockGateway::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "OK");
    assert_eq!(CartApi::new(shop.db.clone()).items(shop.user.id).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn status_poll_completes_an_accepted_payment() {
    let shop = shop().await;
    let txid = "TXN_1700000000000_33333333";
    let order_id = pending_order(&shop, txid).await;
    let mut gateway = MockGateway::new();
    gateway.expect_check_payment().times(1).returning(|_| {
        Ok(GatewayPaymentStatus { status: "ACCEPTED".into(), amount: 3500, currency: "XOF".into(), accepted: true })
    });
    let req = TestRequest::get().uri(&format!("/payment/status/{txid}")).cookie(shop.cookie.clone());
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ACCEPTED");
    assert_eq!(body["amount"], 3500);
    assert_eq!(order_status(&shop, order_id).await, OrderStatusType::Completed);
}

#[actix_web::test]
async fn status_poll_for_an_unknown_transaction() {
    let shop = shop().await;
    let mut gateway = MockGateway::new();
    gateway
        .expect_check_payment()
        .returning(|_| Err(GatewayError::Rejected { code: "662".into(), message: String::new() }));
    let req = TestRequest::get().uri("/payment/status/TXN_1_00000000").cookie(shop.cookie.clone());
    let res = send(req, shop.sessions.clone(), payment_routes(shop.db.clone(), gateway)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"success": false, "message": "Transaction non trouvée"}));
}

#[actix_web::test]
async fn orders_are_private() {
    let shop = shop().await;
    let order_id = pending_order(&shop, "TXN_1700000000000_44444444").await;
    let res = send(
        TestRequest::get().uri(&format!("/orders/{order_id}")).cookie(shop.cookie.clone()),
        shop.sessions.clone(),
        payment_routes(shop.db.clone(), MockGateway::new()),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["order"]["status"], "pending");

    let stranger = login_as(&shop.sessions, shop.user.id + 100).await;
    let res = send(
        TestRequest::get().uri(&format!("/orders/{order_id}")).cookie(stranger.clone()),
        shop.sessions.clone(),
        payment_routes(shop.db.clone(), MockGateway::new()),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let res = send(
        TestRequest::get().uri("/orders").cookie(stranger),
        shop.sessions.clone(),
        payment_routes(shop.db.clone(), MockGateway::new()),
    )
    .await;
    assert_eq!(res.json(), json!([]));
}
