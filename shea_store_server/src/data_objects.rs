use std::{fmt::Display, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use shea_store_engine::{
    db_types::{NewReview, User},
    payment_objects::{CheckoutSession, PaymentRequest},
};

use crate::errors::{FieldError, ServerError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Request bodies check themselves before any handler logic runs. All failures are reported together.
pub trait Validate {
    fn validation_errors(&self) -> Vec<FieldError>;

    fn validate(&self) -> Result<(), ServerError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServerError::ValidationError(errors))
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok()).as_ref()
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !email_regex().is_some_and(|re| re.is_match(email.trim())) {
        errors.push(FieldError::new("email", "Adresse email invalide"));
    }
}

//----------------------------------------------   Auth  ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

impl Validate for LoginRequest {
    fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Le mot de passe est requis"));
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "passwordConfirmation")]
    pub password_confirmation: String,
    #[serde(default)]
    pub remember: bool,
}

impl Validate for RegisterRequest {
    fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().chars().count() < 2 {
            errors.push(FieldError::new("name", "Le nom doit contenir au moins 2 caractères"));
        }
        check_email(&self.email, &mut errors);
        if self.password.chars().count() < 6 {
            errors.push(FieldError::new("password", "Le mot de passe doit contenir au moins 6 caractères"));
        }
        if self.password != self.password_confirmation {
            errors.push(FieldError::new("password_confirmation", "Les mots de passe ne correspondent pas"));
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

//----------------------------------------------   Cart  ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(alias = "product_id")]
    pub product_id: i64,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

impl Validate for AddToCartRequest {
    fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.product_id < 1 {
            errors.push(FieldError::new("productId", "Produit invalide"));
        }
        check_quantity(self.quantity, &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i64,
}

impl Validate for UpdateCartRequest {
    fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_quantity(self.quantity, &mut errors);
        errors
    }
}

fn check_quantity(quantity: i64, errors: &mut Vec<FieldError>) {
    if quantity < 1 {
        errors.push(FieldError::new("quantity", "La quantité doit être au moins 1"));
    }
}

//----------------------------------------------   Reviews  ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ReviewRequest {
    pub fn into_review(self, product_id: i64) -> NewReview {
        let comment = self.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        NewReview { product_id, rating: self.rating, comment }
    }
}

impl Validate for ReviewRequest {
    fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !(1..=5).contains(&self.rating) {
            errors.push(FieldError::new("rating", "La note doit être comprise entre 1 et 5"));
        }
        errors
    }
}

//----------------------------------------------   Payments  ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    /// Integer amount in minor units.
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "shipping_address")]
    pub shipping_address: Option<String>,
    #[serde(default, alias = "billing_address")]
    pub billing_address: Option<String>,
}

impl Validate for InitiatePaymentRequest {
    fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.amount <= 0 {
            errors.push(FieldError::new("amount", "Montant invalide"));
        }
        if let Some(currency) = &self.currency {
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
                errors.push(FieldError::new("currency", "Devise invalide"));
            }
        }
        errors
    }
}

impl From<InitiatePaymentRequest> for PaymentRequest {
    fn from(req: InitiatePaymentRequest) -> Self {
        PaymentRequest {
            amount: req.amount,
            currency: req.currency.map(|c| c.to_uppercase()),
            description: req.description,
            phone: req.phone,
            shipping_address: req.shipping_address,
            billing_address: req.billing_address,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentResponse {
    pub success: bool,
    pub payment_url: String,
    pub payment_token: String,
    pub transaction_id: String,
    pub order_id: i64,
}

impl From<CheckoutSession> for InitiatePaymentResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            success: true,
            payment_url: session.payment_url,
            payment_token: session.payment_token,
            transaction_id: session.transaction_id.to_string(),
            order_id: session.order_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub success: bool,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}
