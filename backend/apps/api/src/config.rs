//! Server configuration from the environment
//!
//! `.env` is loaded by `main` before [`ServerConfig::from_env`] runs.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::config::{MAX_CONFIGURED_DURATION, SameSite};
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

/// Initial admin account, created at startup if missing
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

pub struct ServerConfig {
    pub app_env: AppEnv,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
    pub auth: AuthConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("{name} is invalid"))
}

fn parse_same_site(value: &str) -> anyhow::Result<SameSite> {
    SameSite::parse(value)
        .with_context(|| format!("COOKIE_SAME_SITE must be strict, lax or none, got {value}"))
}

/// Durations above [`MAX_CONFIGURED_DURATION`] would overflow timestamp math
fn bounded_duration(name: &str, secs: u64) -> anyhow::Result<Duration> {
    let duration = Duration::from_secs(secs);
    if duration > MAX_CONFIGURED_DURATION {
        bail!(
            "{name} must be at most {} seconds, got {secs}",
            MAX_CONFIGURED_DURATION.as_secs()
        );
    }
    Ok(duration)
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", b.len()))
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let app_env = match var("APP_ENV").as_deref() {
            Some("production") => AppEnv::Production,
            Some("development") | None => AppEnv::Development,
            Some(other) => bail!("APP_ENV must be development or production, got {other}"),
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = parse_var::<SocketAddr>("BIND_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173,http://127.0.0.1:5173".to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let mut auth = match app_env {
            AppEnv::Production => {
                let secret = var("SESSION_SECRET")
                    .context("SESSION_SECRET must be set in production")?;
                AuthConfig {
                    session_secret: decode_secret(&secret)?,
                    ..AuthConfig::default()
                }
            }
            AppEnv::Development => match var("SESSION_SECRET") {
                Some(secret) => AuthConfig {
                    session_secret: decode_secret(&secret)?,
                    ..AuthConfig::development()
                },
                None => {
                    tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
                    AuthConfig::development()
                }
            },
        };

        if let Some(secs) = parse_var::<u64>("SESSION_TTL_SECS")? {
            auth.session_ttl = bounded_duration("SESSION_TTL_SECS", secs)?;
        }
        if let Some(threshold) = parse_var::<u32>("LOGIN_LOCKOUT_THRESHOLD")? {
            if threshold == 0 {
                bail!("LOGIN_LOCKOUT_THRESHOLD must be at least 1");
            }
            auth.lockout_threshold = threshold;
        }
        if let Some(secs) = parse_var::<u64>("LOGIN_LOCKOUT_SECS")? {
            auth.lockout_duration = bounded_duration("LOGIN_LOCKOUT_SECS", secs)?;
        }
        if let Some(secure) = parse_var::<bool>("COOKIE_SECURE")? {
            auth.cookie_secure = secure;
        }
        if let Some(same_site) = var("COOKIE_SAME_SITE") {
            auth.cookie_same_site = parse_same_site(&same_site)?;
        }
        if auth.cookie_same_site == SameSite::None && !auth.cookie_secure {
            bail!("COOKIE_SAME_SITE=none requires COOKIE_SECURE=true");
        }
        auth.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

        let bootstrap_admin = match (var("BOOTSTRAP_ADMIN_USERNAME"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => bail!("BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            app_env,
            database_url,
            bind_addr,
            frontend_origins,
            auth,
            bootstrap_admin,
        })
    }
}
