use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub addr: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub password_hash_cost: u32,
    pub cors_origins: String,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first so a
    /// local `.env` file is merged in.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            addr: lookup("ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            read_timeout: Duration::from_secs(parse_or(&lookup, "READ_TIMEOUT", 10)?),
            write_timeout: Duration::from_secs(parse_or(&lookup, "WRITE_TIMEOUT", 10)?),
            password_hash_cost: parse_or(&lookup, "PASSWORD_HASH_COST", bcrypt::DEFAULT_COST)?,
            cors_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string()),
        })
    }

    /// Upper bound for one request, body read and response write included.
    pub fn request_timeout(&self) -> Duration {
        self.read_timeout + self.write_timeout
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set when DATABASE_URL is not"));

    let host = required("HOST")?;
    let user = required("POSTGRES_USER")?;
    let password = required("POSTGRES_PASSWORD")?;
    let database = required("POSTGRES_DB")?;
    let port = lookup("PORT").unwrap_or_else(|| "5432".to_string());
    let ssl_mode = lookup("SSL_MODE").unwrap_or_else(|| "disable".to_string());
    let timezone = lookup("TIMEZONE").unwrap_or_else(|| "UTC".to_string());

    Ok(format!(
        "postgres://{user}:{password}@{host}:{port}/{database}?sslmode={ssl_mode}&options=-c%20TimeZone%3D{timezone}"
    ))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
