//! Server configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use academics::{AcademicsConfig, ReEnrollmentPolicy};
use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::config::{DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("APP_ENV must be development or production, got {other:?}"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub env: AppEnv,
    pub max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub academics: AcademicsConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset and empty values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;
        let env = AppEnv::parse(&get("APP_ENV").unwrap_or_default())?;
        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let max_connections = parse_or(
            get("DB_MAX_CONNECTIONS"),
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let auth = match (get("JWT_SECRET"), get("JWT_REFRESH_SECRET")) {
            (Some(access), Some(refresh)) => AuthConfig::with_secrets(access, refresh),
            _ if env == AppEnv::Production => {
                bail!("JWT_SECRET and JWT_REFRESH_SECRET must be set in production")
            }
            _ => {
                tracing::warn!("JWT secrets not set, using random per-process secrets");
                AuthConfig::development()
            }
        }
        .with_ttls(
            parse_or(get("JWT_EXPIRE_SECS"), "JWT_EXPIRE_SECS", DEFAULT_ACCESS_TTL_SECS)?,
            parse_or(
                get("JWT_REFRESH_EXPIRE_SECS"),
                "JWT_REFRESH_EXPIRE_SECS",
                DEFAULT_REFRESH_TTL_SECS,
            )?,
        );
        auth.validate().context("invalid JWT configuration")?;

        let academics = match get("REENROLLMENT_POLICY") {
            Some(value) => AcademicsConfig::with_policy(
                value
                    .parse::<ReEnrollmentPolicy>()
                    .map_err(|e| anyhow::anyhow!("REENROLLMENT_POLICY: {e}"))?,
            ),
            None if env == AppEnv::Development => AcademicsConfig::development(),
            None => AcademicsConfig::default(),
        };

        Ok(Self {
            database_url,
            port,
            env,
            max_connections,
            frontend_origins,
            auth,
            academics,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid number: {raw:?}")),
        None => Ok(default),
    }
}
