//! Process configuration, read from the environment (and `.env` in dev).

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

use rolegate_auth::password::DEFAULT_COST;
use rolegate_auth::token::DEFAULT_TOKEN_LIFETIME_DAYS;
use rolegate_auth::{PasswordHasher, TokenConfig};
use rolegate_infra::SeedConfig;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub token: TokenConfig,
    pub bcrypt_cost: u32,
    /// `None` skips seeding entirely.
    pub seed: Option<SeedConfig>,
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value,
        reason: e.to_string(),
    })
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; missing keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let ttl_days: i64 = match lookup("TOKEN_TTL_DAYS") {
            Some(v) => parse("TOKEN_TTL_DAYS", v)?,
            None => DEFAULT_TOKEN_LIFETIME_DAYS,
        };
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&ttl_days) {
            return Err(ConfigError::Invalid {
                var: "TOKEN_TTL_DAYS",
                value: ttl_days.to_string(),
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_DAYS}"),
            });
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(v) => parse("BCRYPT_COST", v)?,
            None => DEFAULT_COST,
        };

        let bind_addr = parse(
            "BIND_ADDR",
            lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let seed_enabled: bool = match lookup("SEED_DEFAULTS") {
            Some(v) => parse("SEED_DEFAULTS", v)?,
            None => true,
        };
        let seed = seed_enabled.then(|| {
            let defaults = SeedConfig::default();
            SeedConfig {
                admin_user_name: lookup("ADMIN_USER_NAME").unwrap_or(defaults.admin_user_name),
                admin_email: lookup("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
                admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            }
        });

        Ok(Self {
            bind_addr,
            token: TokenConfig::new(secret).with_lifetime(Duration::days(ttl_days)),
            bcrypt_cost,
            seed,
        })
    }

    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost)
    }
}
