use anyhow::{Context, Result, bail};
use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWT_VALIDITY_SECS: u64 = 3600;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_validity_secs: u64,
    pub cors_allowed_origin: Option<String>,
    pub log_level: String,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("APP_PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let jwt_validity_secs = match lookup("JWT_VALIDITY_SECS") {
            Some(raw) => raw.parse::<u64>().with_context(|| {
                format!("JWT_VALIDITY_SECS must be a number of seconds, got {:?}", raw)
            })?,
            None => DEFAULT_JWT_VALIDITY_SECS,
        };
        if jwt_validity_secs == 0 {
            bail!("JWT_VALIDITY_SECS must be positive");
        }

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.is_empty());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            host,
            port,
            jwt_secret,
            jwt_validity_secs,
            cors_allowed_origin,
            log_level,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
