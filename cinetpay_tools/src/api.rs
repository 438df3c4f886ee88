use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::CinetPayConfig,
    data_objects::{PaymentCheckRequest, PaymentInitRequest},
    CinetPayError,
    NewPayment,
    PaymentLink,
    PaymentStatus,
    ResponseEnvelope,
    CHECK_SUCCESS_CODE,
    INIT_SUCCESS_CODE,
};

#[derive(Clone)]
pub struct CinetPayApi {
    config: CinetPayConfig,
    client: Arc<Client>,
}

impl CinetPayApi {
    pub fn new(config: CinetPayConfig) -> Result<Self, CinetPayError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| CinetPayError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &CinetPayConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// POSTs `body` to the gateway and returns the response envelope.
    ///
    /// CinetPay reports business failures inside the envelope, frequently alongside a 4xx status, so the envelope
    /// is parsed whenever the body is JSON. Only non-JSON error bodies become [`CinetPayError::QueryError`].
    pub async fn post_query<B: Serialize>(&self, path: &str, body: &B) -> Result<ResponseEnvelope, CinetPayError> {
        let url = self.url(path);
        trace!("📦️ Sending CinetPay request: {url}");
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<ResponseEnvelope>(&text) {
            Ok(envelope) => {
                trace!("📦️ CinetPay replied {status} with code {}", envelope.code);
                Ok(envelope)
            },
            Err(e) if status.is_success() => Err(CinetPayError::JsonError(e.to_string())),
            Err(_) => Err(CinetPayError::QueryError { status: status.as_u16(), message: text }),
        }
    }

    /// Opens a payment on the hosted checkout page and returns the link the customer must be redirected to.
    pub async fn initiate_payment(&self, payment: &NewPayment) -> Result<PaymentLink, CinetPayError> {
        let body = PaymentInitRequest {
            apikey: self.config.api_key.reveal(),
            site_id: &self.config.site_id,
            payment,
            channels: &self.config.channels,
            lang: &self.config.lang,
        };
        debug!("📦️ Initiating CinetPay payment {} for {} {}", payment.transaction_id, payment.amount, payment.currency);
        let envelope = self.post_query("/payment", &body).await?;
        let link = extract_data::<PaymentLink>(envelope, INIT_SUCCESS_CODE)?;
        info!("📦️ CinetPay payment {} opened", payment.transaction_id);
        Ok(link)
    }

    /// Asks the gateway for the current state of `transaction_id`.
    pub async fn check_payment(&self, transaction_id: &str) -> Result<PaymentStatus, CinetPayError> {
        let body = PaymentCheckRequest {
            apikey: self.config.api_key.reveal(),
            site_id: &self.config.site_id,
            transaction_id,
        };
        debug!("📦️ Checking CinetPay payment {transaction_id}");
        let envelope = self.post_query("/payment/check", &body).await?;
        extract_data::<PaymentStatus>(envelope, CHECK_SUCCESS_CODE)
    }
}

/// Returns the typed `data` object of the envelope if the gateway answered with `success_code`.
pub(crate) fn extract_data<T: DeserializeOwned>(
    envelope: ResponseEnvelope,
    success_code: &str,
) -> Result<T, CinetPayError> {
    if envelope.code != success_code {
        warn!("📦️ CinetPay declined the request. Code {}: {}", envelope.code, envelope.message);
        return Err(CinetPayError::Rejected { code: envelope.code, message: envelope.message });
    }
    let data = envelope.data.ok_or_else(|| CinetPayError::JsonError("Response has no 'data' object".to_string()))?;
    serde_json::from_value(data).map_err(|e| CinetPayError::JsonError(e.to_string()))
}
