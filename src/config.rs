use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::discount::{CouponPolicy, DiscountRounding};
use crate::guard::RouteGuardConfig;

/// Only for dev mode; production must set SESSION_SECRET.
const DEV_SESSION_SECRET: &str = "postwise-dev-session-secret-do-not-use-in-prod";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set outside dev mode")]
    MissingSessionSecret,

    #[error("SESSION_SECRET must be at least 32 bytes")]
    WeakSessionSecret,

    #[error("DISCOUNT_ROUNDING must be 'half_up' or 'half_even', got '{0}'")]
    InvalidRounding(String),

    #[error("APP_ROUTE_PREFIXES entries must start with '/', got '{0}'")]
    InvalidRoutePrefix(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub dev_mode: bool,
    pub session_secret: String,
    pub session_cookie: String,
    pub guard: RouteGuardConfig,
    pub coupon_policy: CouponPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("POSTWISE_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) => secret,
            Err(_) if dev_mode => {
                tracing::warn!("SESSION_SECRET not set, using the built-in dev secret");
                DEV_SESSION_SECRET.to_string()
            }
            Err(_) => return Err(ConfigError::MissingSessionSecret),
        };
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSessionSecret);
        }

        let guard = RouteGuardConfig {
            app_prefixes: parse_route_prefixes(env::var("APP_ROUTE_PREFIXES").ok().as_deref())?,
            ..Default::default()
        };

        let coupon_policy = CouponPolicy {
            rounding: parse_rounding(env::var("DISCOUNT_ROUNDING").ok().as_deref())?,
        };

        Ok(Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "postwise.db".to_string()),
            dev_mode,
            session_secret,
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "postwise_session".to_string()),
            guard,
            coupon_policy,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Comma-separated list of extra authenticated namespaces.
///
/// The namespaces the router mounts (`/app`) are always kept; configured
/// entries are added after them.
pub fn parse_route_prefixes(raw: Option<&str>) -> Result<Vec<String>, ConfigError> {
    let mut prefixes = RouteGuardConfig::default().app_prefixes;

    for p in raw.unwrap_or_default().split(',').map(str::trim) {
        if p.is_empty() {
            continue;
        }
        let prefix = p.trim_end_matches('/');
        if !p.starts_with('/') || prefix.is_empty() {
            return Err(ConfigError::InvalidRoutePrefix(p.to_string()));
        }
        if !prefixes.iter().any(|existing| existing == prefix) {
            prefixes.push(prefix.to_string());
        }
    }

    Ok(prefixes)
}

pub fn parse_rounding(raw: Option<&str>) -> Result<DiscountRounding, ConfigError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(DiscountRounding::default()),
        Some(r) => DiscountRounding::from_str(&r.to_lowercase())
            .map_err(|_| ConfigError::InvalidRounding(r.to_string())),
    }
}
