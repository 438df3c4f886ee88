use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use serde::Serialize;
use shea_store_engine::{
    traits::{CartError, CatalogError, SessionError, UserError},
    AuthApiError,
    OrderFlowError,
};
use thiserror::Error;

pub const VALIDATION_FAILED_MESSAGE: &str = "Données invalides";
pub const INTERNAL_ERROR_MESSAGE: &str = "Erreur interne du serveur";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Identifiants incorrects";
pub const EMAIL_TAKEN_MESSAGE: &str = "Un compte avec cette adresse email existe déjà";
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentification requise";

/// One failed check on a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new<S: Into<String>, T: Into<String>>(field: S, message: T) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{VALIDATION_FAILED_MESSAGE}")]
    ValidationError(Vec<FieldError>),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    AuthenticationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NoRecordFound(String),
    /// The payment gateway turned the request down.
    #[error("{0}")]
    GatewayRejected(String),
    #[error("Le service de paiement ne répond pas. Veuillez réessayer.")]
    GatewayTimeout,
    #[error("Le service de paiement est indisponible.")]
    GatewayUnavailable,
}

impl ServerError {
    pub fn validation<S: Into<String>, T: Into<String>>(field: S, message: T) -> Self {
        Self::ValidationError(vec![FieldError::new(field, message)])
    }

    pub fn unauthenticated() -> Self {
        Self::AuthenticationError(AUTH_REQUIRED_MESSAGE.to_string())
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::GatewayRejected(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::GatewayUnavailable => StatusCode::BAD_GATEWAY,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            Self::ValidationError(errors) => {
                serde_json::json!({ "success": false, "message": VALIDATION_FAILED_MESSAGE, "errors": errors })
            },
            _ if status.is_server_error() && !matches!(self, Self::GatewayTimeout | Self::GatewayUnavailable) => {
                error!("💻️ {self}");
                serde_json::json!({ "success": false, "message": INTERNAL_ERROR_MESSAGE })
            },
            _ => serde_json::json!({ "success": false, "message": self.to_string() }),
        };
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::InvalidCredentials => Self::AuthenticationError(INVALID_CREDENTIALS_MESSAGE.to_string()),
            AuthApiError::EmailAlreadyExists(_) => Self::InvalidRequest(EMAIL_TAKEN_MESSAGE.to_string()),
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AuthApiError::PasswordHashError(e) => Self::BackendError(e.to_string()),
            AuthApiError::SessionError(e) => e.into(),
        }
    }
}

impl From<UserError> for ServerError {
    fn from(e: UserError) -> Self {
        AuthApiError::from(e).into()
    }
}

impl From<SessionError> for ServerError {
    fn from(e: SessionError) -> Self {
        Self::BackendError(format!("Session store error: {e}"))
    }
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::ProductNotFound(_) => Self::NoRecordFound("Produit non trouvé".to_string()),
            CatalogError::CategoryNotFound(_) => Self::NoRecordFound("Catégorie non trouvée".to_string()),
            CatalogError::InvalidRating(_) => Self::validation("rating", "La note doit être comprise entre 1 et 5"),
            CatalogError::DuplicateSlug(_) | CatalogError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<CartError> for ServerError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::ProductNotFound(_) => Self::NoRecordFound("Produit non trouvé".to_string()),
            CartError::InvalidQuantity(_) => Self::validation("quantity", "La quantité doit être au moins 1"),
            CartError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::InvalidAmount(_) => Self::validation("amount", "Montant invalide"),
            OrderFlowError::GatewayRejected { message, .. } => Self::GatewayRejected(message),
            OrderFlowError::GatewayTimeout(_) => Self::GatewayTimeout,
            OrderFlowError::GatewayUnavailable(_) => Self::GatewayUnavailable,
            OrderFlowError::DatabaseError(_) | OrderFlowError::DuplicateTransaction(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}
