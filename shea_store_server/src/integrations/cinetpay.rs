//! Binds the CinetPay client to the engine's [`PaymentGateway`] contract, and turns CinetPay webhook notifications
//! into engine [`PaymentNotification`]s.
use cinetpay_tools::{
    split_customer_name,
    verify_x_token,
    CinetPayApi,
    CinetPayConfig,
    CinetPayError,
    NewPayment,
    NotificationPayload,
};
use log::*;
use shea_store_engine::{
    db_types::{ConversionError, TransactionId},
    payment_objects::{PaymentNotification, PaymentVerdict},
    traits::{GatewayCheckout, GatewayError, GatewayPaymentRequest, GatewayPaymentStatus, PaymentGateway},
};

use crate::config::NotificationAuth;

#[derive(Clone)]
pub struct CinetPayGateway {
    api: CinetPayApi,
}

impl CinetPayGateway {
    pub fn new(config: CinetPayConfig) -> Result<Self, CinetPayError> {
        let api = CinetPayApi::new(config)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &CinetPayApi {
        &self.api
    }

    fn to_new_payment(&self, request: GatewayPaymentRequest) -> NewPayment {
        let (customer_name, customer_surname) = split_customer_name(&request.customer_name);
        let customer_phone_number = request
            .customer_phone
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.api.config().placeholder_phone.clone());
        NewPayment {
            transaction_id: request.transaction_id.to_string(),
            amount: request.amount,
            currency: request.currency,
            description: request.description,
            customer_name,
            customer_surname,
            customer_email: request.customer_email,
            customer_phone_number,
            notify_url: request.notify_url,
            return_url: request.return_url,
        }
    }
}

impl PaymentGateway for CinetPayGateway {
    async fn create_payment(&self, request: GatewayPaymentRequest) -> Result<GatewayCheckout, GatewayError> {
        let payment = self.to_new_payment(request);
        let link = self.api.initiate_payment(&payment).await.map_err(gateway_error)?;
        Ok(GatewayCheckout { payment_url: link.payment_url, payment_token: link.payment_token })
    }

    async fn check_payment(&self, txid: &TransactionId) -> Result<GatewayPaymentStatus, GatewayError> {
        let status = self.api.check_payment(txid.as_str()).await.map_err(gateway_error)?;
        let accepted = status.is_accepted();
        Ok(GatewayPaymentStatus { status: status.status, amount: status.amount, currency: status.currency, accepted })
    }
}

fn gateway_error(e: CinetPayError) -> GatewayError {
    match e {
        CinetPayError::Rejected { code, message } => GatewayError::Rejected { code, message },
        CinetPayError::Timeout(s) => GatewayError::Timeout(s),
        CinetPayError::JsonError(s) => GatewayError::InvalidResponse(s),
        e @ (CinetPayError::Transport(_) | CinetPayError::QueryError { .. } | CinetPayError::Initialization(_)) => {
            GatewayError::Transport(e.to_string())
        },
    }
}

/// Reads the gateway's verdict out of a webhook notification.
pub fn notification_from_payload(payload: &NotificationPayload) -> Result<PaymentNotification, ConversionError> {
    let transaction_id = payload.cpm_trans_id.parse::<TransactionId>()?;
    let verdict = if payload.is_accepted() {
        PaymentVerdict::Accepted
    } else if payload.is_pending() {
        PaymentVerdict::Pending
    } else {
        PaymentVerdict::Failed
    };
    Ok(PaymentNotification { transaction_id, verdict, gateway_status: payload.cpm_trans_status.clone() })
}

impl NotificationAuth {
    /// True if the notification may be acted on. With signature checks on, the `x-token` must match the payload.
    pub fn verify(&self, payload: &NotificationPayload, token: Option<&str>) -> bool {
        if !self.hmac_checks {
            trace!("🔐️ Notification signature checks are disabled. Accepting notification.");
            return true;
        }
        match token {
            Some(token) => verify_x_token(self.secret_key.reveal(), payload, token),
            None => {
                warn!("🔐️ Payment notification for {} carries no x-token.", payload.cpm_trans_id);
                false
            },
        }
    }
}
