use reqwest::Url;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::auth::credentials::Credentials;
use crate::providers::porkbun::DEFAULT_TIMEOUT;

pub const API_KEY_VAR: &str = "PORKBUN_API_KEY";
pub const SECRET_API_KEY_VAR: &str = "PORKBUN_SECRET_API_KEY";
pub const BASE_URL_VAR: &str = "PORKBUN_CUSTOM_BASE_URL";
pub const MAX_RETRIES_VAR: &str = "PORKBUN_MAX_RETRIES";
pub const TIMEOUT_VAR: &str = "PORKBUN_TIMEOUT_SECS";

pub const DEFAULT_MAX_RETRIES: u32 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: Option<Url>,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let optional = |var: &'static str| lookup(var).filter(|v| !v.is_empty());

        let credentials = Credentials::new(required(API_KEY_VAR)?, required(SECRET_API_KEY_VAR)?);

        let base_url = optional(BASE_URL_VAR)
            .map(|raw| {
                Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    var: BASE_URL_VAR,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let max_retries = optional(MAX_RETRIES_VAR)
            .map(|raw| parse_number(MAX_RETRIES_VAR, &raw))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let timeout = optional(TIMEOUT_VAR)
            .map(|raw| parse_number(TIMEOUT_VAR, &raw).map(|secs| Duration::from_secs(secs.into())))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Config {
            credentials,
            base_url,
            max_retries,
            timeout,
        })
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
