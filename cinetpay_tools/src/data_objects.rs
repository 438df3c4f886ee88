use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `code` returned when a payment link was created.
pub const INIT_SUCCESS_CODE: &str = "201";
/// `code` returned by the check endpoint when the transaction is known to the gateway.
pub const CHECK_SUCCESS_CODE: &str = "00";

/// The merchant-side description of a payment to open on the hosted checkout page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPayment {
    pub transaction_id: String,
    /// Integer amount in the currency's smallest accepted unit.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub customer_name: String,
    pub customer_surname: String,
    pub customer_email: String,
    pub customer_phone_number: String,
    pub notify_url: String,
    pub return_url: String,
}

/// The body sent to `POST /payment`. Credentials are added by the client.
#[derive(Debug, Serialize)]
pub(crate) struct PaymentInitRequest<'a> {
    pub apikey: &'a str,
    pub site_id: &'a str,
    #[serde(flatten)]
    pub payment: &'a NewPayment,
    pub channels: &'a str,
    pub lang: &'a str,
}

/// The body sent to `POST /payment/check`.
#[derive(Debug, Serialize)]
pub(crate) struct PaymentCheckRequest<'a> {
    pub apikey: &'a str,
    pub site_id: &'a str,
    pub transaction_id: &'a str,
}

/// Every CinetPay response shares this envelope. `data` depends on the endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponseEnvelope {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PaymentLink {
    pub payment_token: String,
    pub payment_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PaymentStatus {
    pub status: String,
    #[serde(deserialize_with = "amount_from_string_or_number")]
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
}

impl PaymentStatus {
    pub fn is_accepted(&self) -> bool {
        self.status == "ACCEPTED"
    }
}

/// A payment notification posted by CinetPay to the merchant's `notify_url`.
///
/// CinetPay posts these as `application/x-www-form-urlencoded`. Every field is optional on the wire, so missing
/// values deserialize as empty strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationPayload {
    pub cpm_site_id: String,
    pub cpm_trans_id: String,
    pub cpm_trans_date: String,
    pub cpm_amount: String,
    pub cpm_currency: String,
    pub signature: String,
    pub payment_method: String,
    pub cel_phone_num: String,
    pub cpm_phone_prefixe: String,
    pub cpm_language: String,
    pub cpm_version: String,
    pub cpm_payment_config: String,
    pub cpm_page_action: String,
    pub cpm_custom: String,
    pub cpm_designation: String,
    pub cpm_error_message: String,
    pub cpm_result: String,
    pub cpm_trans_status: String,
}

impl NotificationPayload {
    /// The string CinetPay signs to produce the `x-token` header: the listed fields concatenated in a fixed order.
    pub fn x_token_data(&self) -> String {
        [
            &self.cpm_site_id,
            &self.cpm_trans_id,
            &self.cpm_trans_date,
            &self.cpm_amount,
            &self.cpm_currency,
            &self.signature,
            &self.payment_method,
            &self.cel_phone_num,
            &self.cpm_phone_prefixe,
            &self.cpm_language,
            &self.cpm_version,
            &self.cpm_payment_config,
            &self.cpm_page_action,
            &self.cpm_custom,
            &self.cpm_designation,
            &self.cpm_error_message,
        ]
        .into_iter()
        .map(String::as_str)
        .collect()
    }

    pub fn is_accepted(&self) -> bool {
        self.cpm_result == CHECK_SUCCESS_CODE && self.cpm_trans_status == "ACCEPTED"
    }

    /// The customer has not finished paying yet. These notifications carry no final outcome.
    pub fn is_pending(&self) -> bool {
        matches!(self.cpm_trans_status.as_str(), "PENDING" | "WAITING_FOR_CUSTOMER")
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected a string or number, got {other}"))),
    }
}

fn amount_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| de::Error::custom(format!("invalid amount {n}"))),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f.round() as i64).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected an amount, got {other}"))),
    }
}
