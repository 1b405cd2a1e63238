use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub backend_url: String,
    /// Verifies bearer signatures when set; otherwise claims are only read.
    pub jwt_secret: Option<String>,
    pub api_prefix: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub catalog_ttl_secs: u64,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            backend_url: required("BACKEND_URL")?,
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_login_per_min: parsed_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,

            catalog_ttl_secs: parsed_or("CATALOG_TTL_SECS", 3600)?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}
