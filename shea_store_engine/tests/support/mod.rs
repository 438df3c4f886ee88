#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use log::*;
use shea_common::Cents;
use shea_store_engine::{
    db_types::{NewCategory, NewProduct, TransactionId, User},
    AuthApi,
    CatalogManagement,
    GatewayCheckout,
    GatewayError,
    GatewayPaymentRequest,
    GatewayPaymentStatus,
    PaymentGateway,
    SqliteDatabase,
};
pub use shea_store_engine::test_utils::prepare_env::{prepare_test_env, random_db_path};
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub async fn new_database() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.expect("Error dropping database");
}

/// Creates a product with the given price (in minor units) and plenty of stock.
pub async fn add_product(db: &SqliteDatabase, name: &str, price: i64) -> i64 {
    let category = db
        .insert_category(NewCategory::new(format!("{name} category"), format!("{}-cat", name.to_lowercase())))
        .await
        .expect("Error creating category");
    let product = NewProduct::new(name, Cents::from(price)).with_stock(100).in_category(category.id);
    db.insert_product(product).await.expect("Error creating product").id
}

pub async fn add_user(db: &SqliteDatabase, name: &str, email: &str) -> User {
    AuthApi::new(db.clone()).register(name, email, "secret-password").await.expect("Error registering user")
}

/// A gateway that answers from a script and records every payment request it receives.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayState>>,
}

#[derive(Debug, Default)]
struct MockGatewayState {
    create_result: Option<Result<GatewayCheckout, GatewayError>>,
    check_result: Option<Result<GatewayPaymentStatus, GatewayError>>,
    requests: Vec<GatewayPaymentRequest>,
    checks: Vec<TransactionId>,
}

impl MockGateway {
    pub fn accepting() -> Self {
        let gateway = Self::default();
        gateway.will_create(Ok(GatewayCheckout {
            payment_url: "https://checkout.cinetpay.com/payment/abc".into(),
            payment_token: "tok_abc".into(),
        }));
        gateway
    }

    pub fn will_create(&self, result: Result<GatewayCheckout, GatewayError>) {
        self.inner.lock().unwrap().create_result = Some(result);
    }

    pub fn will_report(&self, result: Result<GatewayPaymentStatus, GatewayError>) {
        self.inner.lock().unwrap().check_result = Some(result);
    }

    pub fn requests(&self) -> Vec<GatewayPaymentRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn checks(&self) -> Vec<TransactionId> {
        self.inner.lock().unwrap().checks.clone()
    }
}

pub fn accepted_status(amount: i64) -> GatewayPaymentStatus {
    GatewayPaymentStatus { status: "ACCEPTED".into(), amount, currency: "XOF".into(), accepted: true }
}

impl PaymentGateway for MockGateway {
    async fn create_payment(&self, request: GatewayPaymentRequest) -> Result<GatewayCheckout, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request);
        state.create_result.clone().unwrap_or_else(|| Err(GatewayError::Transport("no script".into())))
    }

    async fn check_payment(&self, txid: &TransactionId) -> Result<GatewayPaymentStatus, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.checks.push(txid.clone());
        state.check_result.clone().unwrap_or_else(|| Err(GatewayError::Transport("no script".into())))
    }
}
