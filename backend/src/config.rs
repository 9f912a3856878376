//! Environment-driven application configuration.
//!
//! Configuration is read through the [`ConfigEnv`] trait so tests can supply
//! values without touching the process environment. Gateway credentials fall
//! back to test placeholders with a warning so a development server boots
//! without secrets; production deployments set the real pair.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::currency::CurrencyCode;
use crate::outbound::RazorpayConfig;

/// Bind address variable.
const BIND_ENV: &str = "LINGOBRIDGE_BIND";
/// Gateway REST base URL variable.
const GATEWAY_URL_ENV: &str = "RAZORPAY_BASE_URL";
/// Gateway key id variable.
const GATEWAY_KEY_ID_ENV: &str = "RAZORPAY_KEY_ID";
/// Gateway key secret variable.
const GATEWAY_KEY_SECRET_ENV: &str = "RAZORPAY_KEY_SECRET";
/// Gateway settlement currency variable.
const GATEWAY_CURRENCY_ENV: &str = "GATEWAY_CURRENCY";
/// Gateway request deadline variable, in seconds.
const GATEWAY_TIMEOUT_ENV: &str = "GATEWAY_TIMEOUT_SECONDS";
/// Geolocation lookup endpoint variable.
const GEOLOCATION_URL_ENV: &str = "GEOLOCATION_URL";
/// Geolocation request deadline variable, in seconds.
const GEOLOCATION_TIMEOUT_ENV: &str = "GEOLOCATION_TIMEOUT_SECONDS";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_GATEWAY_URL: &str = "https://api.razorpay.com/v1/";
const DEFAULT_GATEWAY_CURRENCY: &str = "INR";
const DEFAULT_GATEWAY_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json/";
const DEFAULT_GEOLOCATION_TIMEOUT_SECONDS: u64 = 5;

/// Environment access used by [`AppConfig::from_env`].
pub trait ConfigEnv {
    /// Look up one variable.
    fn var(&self, name: &str) -> Option<String>;
}

/// [`ConfigEnv`] backed by the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigEnv for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// [`ConfigEnv`] backed by a map, for tests.
#[derive(Debug, Default, Clone)]
pub struct MapEnv(pub HashMap<String, String>);

impl ConfigEnv for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Configuration failures raised while reading the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable did not parse into its expected shape.
    #[error("{name} is invalid: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parser detail.
        message: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            message: message.into(),
        }
    }
}

/// Application configuration assembled from the environment.
pub struct AppConfig {
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Payment gateway credentials and transport settings.
    pub gateway: RazorpayConfig,
    /// Currency amounts are converted into before crossing the gateway.
    pub gateway_currency: CurrencyCode,
    /// Geolocation lookup endpoint.
    pub geolocation_url: Url,
    /// Geolocation request deadline.
    pub geolocation_timeout: Duration,
}

fn parse_url(env: &dyn ConfigEnv, name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env.var(name).unwrap_or_else(|| default.to_owned());
    Url::parse(raw.as_str()).map_err(|error| ConfigError::invalid(name, error.to_string()))
}

fn parse_seconds(
    env: &dyn ConfigEnv,
    name: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    env.var(name).map_or(Ok(Duration::from_secs(default)), |raw| {
        raw.parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|error| ConfigError::invalid(name, error.to_string()))
    })
}

impl AppConfig {
    /// Assemble the configuration from the given environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed.
    pub fn from_env(env: &dyn ConfigEnv) -> Result<Self, ConfigError> {
        let bind_raw = env.var(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| ConfigError::invalid(BIND_ENV, format!("not a socket address: {bind_raw}")))?;

        let key_id = env.var(GATEWAY_KEY_ID_ENV).unwrap_or_else(|| {
            warn!("{GATEWAY_KEY_ID_ENV} not set, using a test placeholder (dev only)");
            "rzp_test_key".to_owned()
        });
        let key_secret = env.var(GATEWAY_KEY_SECRET_ENV).unwrap_or_else(|| {
            warn!("{GATEWAY_KEY_SECRET_ENV} not set, using a test placeholder (dev only)");
            "rzp_test_secret".to_owned()
        });

        let gateway_currency_raw = env
            .var(GATEWAY_CURRENCY_ENV)
            .unwrap_or_else(|| DEFAULT_GATEWAY_CURRENCY.to_owned());
        let gateway_currency = CurrencyCode::new(gateway_currency_raw.as_str())
            .map_err(|error| ConfigError::invalid(GATEWAY_CURRENCY_ENV, error.to_string()))?;

        Ok(Self {
            bind_addr,
            gateway: RazorpayConfig {
                base_url: parse_url(env, GATEWAY_URL_ENV, DEFAULT_GATEWAY_URL)?,
                key_id,
                key_secret: Zeroizing::new(key_secret),
                timeout: parse_seconds(env, GATEWAY_TIMEOUT_ENV, DEFAULT_GATEWAY_TIMEOUT_SECONDS)?,
            },
            gateway_currency,
            geolocation_url: parse_url(env, GEOLOCATION_URL_ENV, DEFAULT_GEOLOCATION_URL)?,
            geolocation_timeout: parse_seconds(
                env,
                GEOLOCATION_TIMEOUT_ENV,
                DEFAULT_GEOLOCATION_TIMEOUT_SECONDS,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for environment parsing.

    use super::*;

    fn env_with(pairs: &[(&str, &str)]) -> MapEnv {
        MapEnv(
            pairs
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn defaults_cover_a_bare_environment() {
        let config = AppConfig::from_env(&MapEnv::default()).expect("defaults apply");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.gateway_currency.as_str(), "INR");
        assert_eq!(config.gateway.timeout, Duration::from_secs(30));
        assert_eq!(config.geolocation_timeout, Duration::from_secs(5));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let env = env_with(&[
            ("LINGOBRIDGE_BIND", "127.0.0.1:9090"),
            ("GATEWAY_CURRENCY", "USD"),
            ("GATEWAY_TIMEOUT_SECONDS", "5"),
            ("RAZORPAY_KEY_ID", "rzp_live_abc"),
            ("RAZORPAY_KEY_SECRET", "shh"),
        ]);
        let config = AppConfig::from_env(&env).expect("values parse");
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(config.gateway_currency.as_str(), "USD");
        assert_eq!(config.gateway.timeout, Duration::from_secs(5));
        assert_eq!(config.gateway.key_id, "rzp_live_abc");
    }

    #[test]
    fn malformed_values_are_rejected_by_name() {
        let env = env_with(&[("GATEWAY_TIMEOUT_SECONDS", "soon")]);
        let error = AppConfig::from_env(&env).expect_err("malformed timeout rejected");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "GATEWAY_TIMEOUT_SECONDS",
                ..
            }
        ));
    }

    #[test]
    fn malformed_bind_addresses_are_rejected() {
        let env = env_with(&[("LINGOBRIDGE_BIND", "nowhere")]);
        assert!(AppConfig::from_env(&env).is_err());
    }
}
