use actix_web::{
    cookie::Cookie,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{TimeZone, Utc};
use log::debug;
use serde_json::json;
use shea_store_engine::{
    db_types::{Product, User},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    MemorySessionStore,
    SessionApi,
    SessionStore,
    SqliteDatabase,
};

use crate::{
    config::ServerOptions,
    middleware::{SessionMiddlewareFactory, SESSION_COOKIE},
    server::json_config,
};

pub type Sessions = web::Data<SessionApi<SessionStore>>;

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    pub cookies: Vec<Cookie<'static>>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|c| c.name() == name)
    }
}

pub fn memory_sessions() -> Sessions {
    web::Data::new(SessionApi::new(SessionStore::Memory(MemorySessionStore::new())))
}

/// Starts a session for `user_id` and returns the cookie a browser would send back.
pub async fn login_as(sessions: &Sessions, user_id: i64) -> Cookie<'static> {
    let session = sessions.start_session(user_id).await.expect("Could not start session");
    Cookie::new(SESSION_COOKIE, session.key)
}

/// Sends `req` to an app with the session middleware, the JSON error handler and default server options, plus
/// whatever `configure` registers.
pub async fn send<F>(req: TestRequest, sessions: Sessions, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .wrap(SessionMiddlewareFactory::new())
        .app_data(json_config())
        .app_data(sessions)
        .app_data(web::Data::new(ServerOptions::default()))
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let cookies = res.response().cookies().map(|c| c.into_owned()).collect();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    TestResponse { status, body, cookies }
}

pub async fn new_database() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub fn sample_user(id: i64, password_hash: &str) -> User {
    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    User {
        id,
        name: "Awa Traoré".to_string(),
        email: "awa@example.com".to_string(),
        password_hash: password_hash.to_string(),
        created_at: ts,
        updated_at: ts,
    }
}

pub fn sample_product(id: i64, name: &str, price: i64) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "description": "",
        "price": price,
        "originalPrice": null,
        "stock": 10,
        "categoryId": 1,
        "images": [],
        "rating": 4.5,
        "reviewCount": 2,
        "isActive": true,
        "isFeatured": true,
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z"
    }))
    .expect("Invalid product")
}
