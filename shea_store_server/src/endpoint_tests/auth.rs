use actix_web::{http::StatusCode, test::TestRequest, web};
use shea_store_engine::{helpers::hash_password, AuthApi};

use super::{
    helpers::{login_as, memory_sessions, sample_user, send},
    mocks::MockUserStore,
};
use crate::{
    middleware::SESSION_COOKIE,
    routes::{CurrentUserRoute, LoginRoute, LogoutRoute, RegisterRoute},
};

fn auth_routes(store: MockUserStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AuthApi::new(store)))
            .service(LoginRoute::<MockUserStore>::new())
            .service(RegisterRoute::<MockUserStore>::new())
            .service(LogoutRoute::new())
            .service(CurrentUserRoute::<MockUserStore>::new());
    }
}

fn store_with_awa(password: &str) -> MockUserStore {
    let hash = hash_password(password).unwrap();
    let mut store = MockUserStore::new();
    store.expect_fetch_user_by_email().returning(move |email| {
        if email == "awa@example.com" {
            Ok(Some(sample_user(7, &hash)))
        } else {
            Ok(None)
        }
    });
    store
}

#[actix_web::test]
async fn register_logs_the_new_user_in() {
    let _ = env_logger::try_init().ok();
    let mut store = MockUserStore::new();
    store.expect_fetch_user_by_email().times(1).returning(|_| Ok(None));
    store.expect_insert_user().times(1).returning(|user| {
        assert_eq!(user.email, "awa@example.com");
        assert_ne!(user.password_hash, "secret1");
        Ok(sample_user(7, &user.password_hash))
    });
    let sessions = memory_sessions();
    let req = TestRequest::post().uri("/auth/register").set_json(serde_json::json!({
        "name": "Awa Traoré",
        "email": " Awa@Example.com ",
        "password": "secret1",
        "password_confirmation": "secret1"
    }));
    let res = send(req, sessions.clone(), auth_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "awa@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    let cookie = res.cookie(SESSION_COOKIE).expect("No session cookie");
    let session = sessions.resolve(cookie.value()).await.unwrap().expect("Session not stored");
    assert_eq!(session.user_id, 7);
}

#[actix_web::test]
async fn register_reports_every_invalid_field() {
    let _ = env_logger::try_init().ok();
    let store = MockUserStore::new();
    let req = TestRequest::post().uri("/auth/register").set_json(serde_json::json!({
        "name": "A",
        "email": "nope",
        "password": "123",
        "password_confirmation": "456"
    }));
    let res = send(req, memory_sessions(), auth_routes(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert_eq!(body["message"], "Données invalides");
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn duplicate_registration_is_refused() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_awa("secret1");
    store.expect_insert_user().never();
    let req = TestRequest::post().uri("/auth/register").set_json(serde_json::json!({
        "name": "Awa bis",
        "email": "awa@example.com",
        "password": "secret2",
        "passwordConfirmation": "secret2"
    }));
    let res = send(req, memory_sessions(), auth_routes(store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["message"], "Un compte avec cette adresse email existe déjà");
    assert!(res.cookie(SESSION_COOKIE).is_none());
}

#[actix_web::test]
async fn bad_credentials_look_the_same() {
    let _ = env_logger::try_init().ok();
    let wrong_password = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({"email": "awa@example.com", "password": "wrong-one"}));
    let res = send(wrong_password, memory_sessions(), auth_routes(store_with_awa("secret1"))).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let first = res.json();

    let unknown_email = TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({"email": "moussa@example.com", "password": "secret1"}));
    let res = send(unknown_email, memory_sessions(), auth_routes(store_with_awa("secret1"))).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json(), first);
    assert_eq!(first["message"], "Identifiants incorrects");
}

#[actix_web::test]
async fn remember_me_sets_a_persistent_cookie() {
    let _ = env_logger::try_init().ok();
    let login = |remember: bool| {
        TestRequest::post().uri("/auth/login").set_json(serde_json::json!({
            "email": "awa@example.com",
            "password": "secret1",
            "remember": remember
        }))
    };
    let res = send(login(true), memory_sessions(), auth_routes(store_with_awa("secret1"))).await;
    assert_eq!(res.status, StatusCode::OK);
    let cookie = res.cookie(SESSION_COOKIE).unwrap();
    assert!(cookie.max_age().is_some());
    assert_eq!(cookie.http_only(), Some(true));

    let res = send(login(false), memory_sessions(), auth_routes(store_with_awa("secret1"))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.cookie(SESSION_COOKIE).unwrap().max_age().is_none());
}

#[actix_web::test]
async fn current_user_needs_a_session() {
    let _ = env_logger::try_init().ok();
    let res = send(TestRequest::get().uri("/auth/user"), memory_sessions(), auth_routes(MockUserStore::new())).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["message"], "Authentification requise");

    let sessions = memory_sessions();
    let cookie = login_as(&sessions, 7).await;
    let mut store = MockUserStore::new();
    store.expect_fetch_user().withf(|id| *id == 7).returning(|id| Ok(Some(sample_user(id, "hash"))));
    let req = TestRequest::get().uri("/auth/user").cookie(cookie);
    let res = send(req, sessions, auth_routes(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["name"], "Awa Traoré");
}

#[actix_web::test]
async fn unknown_session_keys_are_anonymous() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/auth/user").cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "forged"));
    let res = send(req, memory_sessions(), auth_routes(MockUserStore::new())).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let _ = env_logger::try_init().ok();
    let sessions = memory_sessions();
    let cookie = login_as(&sessions, 7).await;
    let key = cookie.value().to_string();
    let req = TestRequest::post().uri("/auth/logout").cookie(cookie);
    let res = send(req, sessions.clone(), auth_routes(MockUserStore::new())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["success"], true);
    assert_eq!(res.cookie(SESSION_COOKIE).unwrap().value(), "");
    assert!(sessions.resolve(&key).await.unwrap().is_none());

    // Logging out twice is harmless
    let res = send(TestRequest::post().uri("/auth/logout"), sessions, auth_routes(MockUserStore::new())).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"email\": ");
    let res = send(req, memory_sessions(), auth_routes(MockUserStore::new())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["message"], "Données invalides");
}
