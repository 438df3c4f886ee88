use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::NotificationPayload;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, data: &[u8]) -> Option<HmacSha256> {
    // HMAC accepts keys of any length, so this never fails
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(data);
    Some(mac)
}

/// Hex-encoded HMAC-SHA256 of `data`, keyed with `secret`.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    keyed_mac(secret, data).map(|mac| hex::encode(mac.finalize().into_bytes())).unwrap_or_default()
}

/// Checks the `x-token` header of a webhook notification against the merchant secret. The comparison runs in
/// constant time.
pub fn verify_x_token(secret: &str, payload: &NotificationPayload, token: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(token) = hex::decode(token.trim()) else {
        return false;
    };
    if token.is_empty() {
        return false;
    }
    keyed_mac(secret, payload.x_token_data().as_bytes()).is_some_and(|mac| mac.verify_slice(&token).is_ok())
}

/// Used as `customer_name` when the customer has no name on file.
pub const DEFAULT_CUSTOMER_NAME: &str = "Client";

/// Splits a display name into CinetPay's `customer_name` (first word) and `customer_surname` (the rest).
pub fn split_customer_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None if name.is_empty() => (DEFAULT_CUSTOMER_NAME.to_string(), String::new()),
        None => (name.to_string(), String::new()),
    }
}
