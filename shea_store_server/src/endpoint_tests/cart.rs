use actix_web::{http::StatusCode, test::TestRequest, web};
use serde_json::json;
use shea_store_engine::{
    db_types::{CartItem, CartLine},
    traits::CartError,
    CartApi,
};

use super::{
    helpers::{login_as, memory_sessions, send, Sessions},
    mocks::MockCartStore,
};
use crate::routes::{AddToCartRoute, CartRoute, CartSummaryRoute, ClearCartRoute, RemoveCartItemRoute, UpdateCartItemRoute};

fn cart_routes(store: MockCartStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CartApi::new(store)))
            .service(CartSummaryRoute::<MockCartStore>::new())
            .service(CartRoute::<MockCartStore>::new())
            .service(AddToCartRoute::<MockCartStore>::new())
            .service(ClearCartRoute::<MockCartStore>::new())
            .service(UpdateCartItemRoute::<MockCartStore>::new())
            .service(RemoveCartItemRoute::<MockCartStore>::new());
    }
}

fn cart_item(product_id: i64, quantity: i64) -> CartItem {
    serde_json::from_value(json!({
        "id": 1,
        "userId": 7,
        "productId": product_id,
        "quantity": quantity,
        "createdAt": "2024-03-02T10:00:00Z",
        "updatedAt": "2024-03-02T10:05:00Z"
    }))
    .unwrap()
}

fn line(product_id: i64, price: i64, quantity: i64) -> CartLine {
    CartLine { product_id, quantity, name: format!("Produit {product_id}"), price: price.into(), image: None, stock: 10 }
}

async fn logged_in() -> (Sessions, actix_web::cookie::Cookie<'static>) {
    let sessions = memory_sessions();
    let cookie = login_as(&sessions, 7).await;
    (sessions, cookie)
}

#[actix_web::test]
async fn cart_requires_a_session() {
    let _ = env_logger::try_init().ok();
    let mut store = MockCartStore::new();
    store.expect_fetch_cart().never();
    let res = send(TestRequest::get().uri("/cart"), memory_sessions(), cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn adding_to_the_cart() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store
        .expect_add_cart_item()
        .withf(|user, product, qty| *user == 7 && *product == 3 && *qty == 2)
        .times(1)
        .returning(|_, p, _| Ok(cart_item(p, 5)));
    let req = TestRequest::post().uri("/cart").cookie(cookie).set_json(json!({"productId": 3, "quantity": 2}));
    let res = send(req, sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["quantity"], 5);
}

#[actix_web::test]
async fn adding_an_unknown_product() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_add_cart_item().returning(|_, p, _| Err(CartError::ProductNotFound(p)));
    let req = TestRequest::post().uri("/cart").cookie(cookie).set_json(json!({"product_id": 99}));
    let res = send(req, sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn zero_quantities_are_rejected() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_update_cart_item().never();
    let req = TestRequest::put().uri("/cart/3").cookie(cookie).set_json(json!({"quantity": 0}));
    let res = send(req, sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["errors"][0]["field"], "quantity");
}

#[actix_web::test]
async fn updating_an_item_not_in_the_cart() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_update_cart_item().returning(|_, _, _| Ok(None));
    let req = TestRequest::put().uri("/cart/3").cookie(cookie).set_json(json!({"quantity": 4}));
    let res = send(req, sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn removing_items() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_remove_cart_item().returning(|_, product| Ok(product == 3));
    let store_for_missing = {
        let mut s = MockCartStore::new();
        s.expect_remove_cart_item().returning(|_, _| Ok(false));
        s
    };
    let req = TestRequest::delete().uri("/cart/3").cookie(cookie.clone());
    let res = send(req, sessions.clone(), cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["success"], true);

    let req = TestRequest::delete().uri("/cart/4").cookie(cookie);
    let res = send(req, sessions, cart_routes(store_for_missing)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn clearing_an_empty_cart_succeeds() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_clear_cart().times(1).returning(|_| Ok(false));
    let res = send(TestRequest::delete().uri("/cart").cookie(cookie), sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["success"], true);
}

#[actix_web::test]
async fn cart_summary_applies_shipping() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_fetch_cart().returning(|_| Ok(vec![line(1, 1000, 3)]));
    let res = send(TestRequest::get().uri("/cart/summary").cookie(cookie), sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["item_count"], 3);
    assert_eq!(body["subtotal"], 3000);
    assert_eq!(body["shipping"], 500);
    assert_eq!(body["total"], 3500);
}

#[actix_web::test]
async fn cart_lines() {
    let _ = env_logger::try_init().ok();
    let (sessions, cookie) = logged_in().await;
    let mut store = MockCartStore::new();
    store.expect_fetch_cart().returning(|_| Ok(vec![line(1, 2499, 2), line(2, 2299, 1)]));
    let res = send(TestRequest::get().uri("/cart").cookie(cookie), sessions, cart_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body[0]["productId"], 1);
    assert_eq!(body[1]["price"], 2299);
}
