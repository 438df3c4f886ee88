use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
pub use shea_common::Cents;
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        User         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Stored in normalized (trimmed, lowercase) form.
    pub email: String,
    pub password_hash: String,
}

/// Trims and lowercases an email address so that uniqueness checks are not fooled by formatting.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

//--------------------------------------      Category       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new<S: Into<String>>(name: S, slug: S) -> Self {
        Self { name: name.into(), slug: slug.into(), description: None }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Cents,
    pub original_price: Option<Cents>,
    pub stock: i64,
    pub category_id: Option<i64>,
    pub images: Json<Vec<String>>,
    pub rating: f64,
    pub review_count: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Cents,
    pub original_price: Option<Cents>,
    pub stock: i64,
    pub category_id: Option<i64>,
    pub images: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub is_featured: bool,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, price: Cents) -> Self {
        Self { name: name.into(), price, ..Default::default() }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_original_price(mut self, price: Cents) -> Self {
        self.original_price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_image<S: Into<String>>(mut self, url: S) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: i64) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }
}

//--------------------------------------      CartItem       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row joined with the product data needed to display it and price it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
    pub name: String,
    pub price: Cents,
    pub image: Option<String>,
    pub stock: i64,
}

impl CartLine {
    pub fn line_total(&self) -> Cents {
        self.price * self.quantity
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// `Pending` is the only non-terminal state. An order leaves it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    Pending,
    Completed,
    Failed,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------    TransactionId    ---------------------------------------------------------
/// The merchant-side payment reference shared with the gateway. Format: `TXN_<unix millis>_<8 hex chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = rand::random::<u32>();
        Self(format!("TXN_{millis}_{suffix:08x}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for TransactionId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConversionError("Transaction id cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatusType,
    pub total_amount: Cents,
    pub currency: String,
    pub payment_method: String,
    /// The last status string reported by the gateway for this order, if any.
    pub payment_status: Option<String>,
    pub transaction_id: TransactionId,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub total_amount: Cents,
    pub currency: String,
    pub payment_method: String,
    pub transaction_id: TransactionId,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
}

impl NewOrder {
    pub fn new(user_id: i64, total_amount: Cents, currency: &str, transaction_id: TransactionId) -> Self {
        Self {
            user_id,
            total_amount,
            currency: currency.to_string(),
            payment_method: "cinetpay".to_string(),
            transaction_id,
            shipping_address: None,
            billing_address: None,
        }
    }

    pub fn with_payment_method<S: Into<String>>(mut self, method: S) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_shipping_address(mut self, address: Option<String>) -> Self {
        self.shipping_address = address;
        self
    }

    pub fn with_billing_address(mut self, address: Option<String>) -> Self {
        self.billing_address = address;
        self
    }
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
/// A snapshot of one cart line, taken when the order was opened.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: Cents,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       Review        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}

//--------------------------------------       Session       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Session {
    #[sqlx(rename = "session_key")]
    pub key: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub key: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl NewSession {
    /// Creates a session for `user_id` under a fresh, random 256-bit key.
    pub fn new(user_id: i64, expires_at: DateTime<Utc>) -> Self {
        let bytes = rand::random::<[u8; 32]>();
        Self { key: hex::encode(bytes), user_id, expires_at }
    }
}
