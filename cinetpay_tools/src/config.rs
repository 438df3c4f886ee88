use std::time::Duration;

use log::*;
use shea_common::Secret;

pub const DEFAULT_BASE_URL: &str = "https://api-checkout.cinetpay.com/v2";
pub const DEFAULT_PLACEHOLDER_PHONE: &str = "+22500000000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct CinetPayConfig {
    pub api_key: Secret<String>,
    pub site_id: String,
    /// The merchant secret used to sign webhook notifications (`x-token`).
    pub secret_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
    /// Sent as `customer_phone_number` when the customer did not provide one.
    pub placeholder_phone: String,
    pub channels: String,
    pub lang: String,
}

impl Default for CinetPayConfig {
    fn default() -> Self {
        Self {
            api_key: Secret::default(),
            site_id: String::default(),
            secret_key: Secret::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            placeholder_phone: DEFAULT_PLACEHOLDER_PHONE.to_string(),
            channels: "ALL".to_string(),
            lang: "FR".to_string(),
        }
    }
}

impl CinetPayConfig {
    pub fn new_from_env_or_default() -> Self {
        let defaults = Self::default();
        let api_key = Secret::new(std::env::var("SHEA_CINETPAY_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ SHEA_CINETPAY_API_KEY not set. Payment initiation will be rejected by the gateway.");
            String::default()
        }));
        let site_id = std::env::var("SHEA_CINETPAY_SITE_ID").unwrap_or_else(|_| {
            warn!("🪛️ SHEA_CINETPAY_SITE_ID not set. Payment initiation will be rejected by the gateway.");
            String::default()
        });
        let secret_key = Secret::new(std::env::var("SHEA_CINETPAY_SECRET_KEY").unwrap_or_else(|_| {
            warn!("🪛️ SHEA_CINETPAY_SECRET_KEY not set. Webhook notifications cannot be authenticated.");
            String::default()
        }));
        let base_url = std::env::var("SHEA_CINETPAY_BASE_URL").unwrap_or_else(|_| {
            info!("🪛️ SHEA_CINETPAY_BASE_URL not set, using {DEFAULT_BASE_URL}");
            defaults.base_url.clone()
        });
        let timeout = std::env::var("SHEA_CINETPAY_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid SHEA_CINETPAY_TIMEOUT value ({s}): {e}. Using the default instead."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let placeholder_phone =
            std::env::var("SHEA_CINETPAY_PLACEHOLDER_PHONE").unwrap_or(defaults.placeholder_phone.clone());
        Self {
            api_key,
            site_id,
            secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            placeholder_phone,
            ..defaults
        }
    }
}
