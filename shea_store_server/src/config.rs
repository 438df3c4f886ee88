use std::{env, net::IpAddr};

use chrono::Duration;
use cinetpay_tools::CinetPayConfig;
use log::*;
use shea_common::{parse_boolean_flag, parse_list, Secret};
use shea_store_engine::store_api::session_api::DEFAULT_SESSION_TTL_SECS;

const DEFAULT_SHEA_HOST: &str = "127.0.0.1";
const DEFAULT_SHEA_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/shea_store.db";
const DEFAULT_REAPER_INTERVAL_SECS: u64 = 900;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The public base URL of the storefront, e.g. `https://boutique.example.com`. Gateway callback URLs are built
    /// from it. When unset, they are derived from each request's scheme and host.
    pub public_url: Option<String>,
    pub session_backend: SessionBackend,
    pub session_ttl: Duration,
    /// Adds the `Secure` attribute to session cookies. Turn this on whenever the server is reached over HTTPS.
    pub secure_cookies: bool,
    /// How often expired sessions are purged.
    pub session_reaper_interval: std::time::Duration,
    /// Load the demonstration catalog when the store is empty.
    pub seed_sample_data: bool,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    pub gateway: GatewayConfig,
}

#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    pub api: CinetPayConfig,
    /// Require a valid `x-token` signature on payment notifications.
    pub hmac_checks: bool,
    /// If supplied, payment notifications are only accepted from these addresses.
    pub whitelist: Option<Vec<IpAddr>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHEA_HOST.to_string(),
            port: DEFAULT_SHEA_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            public_url: None,
            session_backend: SessionBackend::default(),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            secure_cookies: false,
            session_reaper_interval: std::time::Duration::from_secs(DEFAULT_REAPER_INTERVAL_SECS),
            seed_sample_data: true,
            use_x_forwarded_for: false,
            use_forwarded: false,
            gateway: GatewayConfig { hmac_checks: true, ..Default::default() },
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let host = env::var("SHEA_HOST").ok().unwrap_or_else(|| DEFAULT_SHEA_HOST.into());
        let port = env::var("SHEA_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SHEA_PORT. {e} Using the default, {DEFAULT_SHEA_PORT}, instead."
                    );
                    DEFAULT_SHEA_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SHEA_PORT);
        let database_url = env::var("SHEA_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SHEA_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let public_url = env::var("SHEA_PUBLIC_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());
        if public_url.is_none() {
            info!("🪛️ SHEA_PUBLIC_URL is not set. Payment callback URLs will be derived from incoming requests.");
        }
        let session_backend = match env::var("SHEA_SESSION_BACKEND").map(|s| s.to_lowercase()) {
            Ok(s) if s == "memory" => SessionBackend::Memory,
            Ok(s) if s == "sqlite" => SessionBackend::Sqlite,
            Ok(s) => {
                warn!("🪛️ Unknown SHEA_SESSION_BACKEND '{s}'. Using 'sqlite'.");
                SessionBackend::Sqlite
            },
            Err(_) => SessionBackend::Sqlite,
        };
        let session_ttl = env::var("SHEA_SESSION_TTL_HOURS")
            .map_err(|_| {
                info!(
                    "🪛️ SHEA_SESSION_TTL_HOURS is not set. Using the default value of {} hrs.",
                    defaults.session_ttl.num_hours()
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::hours)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SHEA_SESSION_TTL_HOURS. {e}"))
            })
            .ok()
            .unwrap_or(defaults.session_ttl);
        let session_reaper_interval = env::var("SHEA_SESSION_REAPER_INTERVAL")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SHEA_SESSION_REAPER_INTERVAL. {e}"))
                    .ok()
            })
            .map(std::time::Duration::from_secs)
            .unwrap_or(defaults.session_reaper_interval);
        let secure_cookies = parse_boolean_flag(env::var("SHEA_SECURE_COOKIES").ok(), false);
        let seed_sample_data = parse_boolean_flag(env::var("SHEA_SEED_SAMPLE_DATA").ok(), true);
        let use_x_forwarded_for = parse_boolean_flag(env::var("SHEA_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("SHEA_USE_FORWARDED").ok(), false);
        let gateway = GatewayConfig::from_env_or_defaults();
        Self {
            host,
            port,
            database_url,
            public_url,
            session_backend,
            session_ttl,
            secure_cookies,
            session_reaper_interval,
            seed_sample_data,
            use_x_forwarded_for,
            use_forwarded,
            gateway,
        }
    }
}

impl GatewayConfig {
    pub fn from_env_or_defaults() -> Self {
        let api = CinetPayConfig::new_from_env_or_default();
        let hmac_checks = parse_boolean_flag(env::var("SHEA_CINETPAY_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!("🚨️ Payment notification signatures will NOT be checked. Do not run production like this.");
        }
        let whitelist = env::var("SHEA_CINETPAY_WHITELIST").ok().and_then(|s| parse_whitelist(&s));
        match &whitelist {
            Some(whitelist) if whitelist.is_empty() => {
                warn!(
                    "🚨️ The CinetPay IP whitelist was configured, but is empty. The server will run, but won't accept \
                     any payment notifications."
                );
            },
            None => {
                info!("🪛️ No CinetPay IP whitelist is set. Only signature validation will be used.");
            },
            Some(v) => {
                let addrs = v.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                info!("🪛️ CinetPay IP whitelist: {addrs}");
            },
        }
        Self { api, hmac_checks, whitelist }
    }
}

/// `none`, `false` and `0` disable the whitelist. Anything else is read as a comma-separated list of addresses.
fn parse_whitelist(value: &str) -> Option<Vec<IpAddr>> {
    if ["none", "false", "0", ""].contains(&value.trim().to_lowercase().as_str()) {
        return None;
    }
    let addrs = parse_list(value)
        .into_iter()
        .filter_map(|s| {
            s.parse()
                .map_err(|e| warn!("🪛️ Ignoring invalid IP address ({s}) in SHEA_CINETPAY_WHITELIST: {e}"))
                .ok()
        })
        .collect();
    Some(addrs)
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that handlers need at request time. Secrets stay out of it.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub public_url: Option<String>,
    pub session_ttl: Duration,
    pub secure_cookies: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            public_url: config.public_url.clone(),
            session_ttl: config.session_ttl,
            secure_cookies: config.secure_cookies,
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

/// Decides whether a payment notification can be trusted.
#[derive(Clone, Debug)]
pub struct NotificationAuth {
    pub hmac_checks: bool,
    pub secret_key: Secret<String>,
}

impl NotificationAuth {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self { hmac_checks: config.hmac_checks, secret_key: config.api.secret_key.clone() }
    }
}
