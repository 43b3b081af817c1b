//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;

use crate::error::{AuthError, AuthResult};

/// 7 days
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 7 * 24 * 3600;
/// 30 days
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 3600;
/// Upper bound for either lifetime (10 years)
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens
    pub access_secret: Vec<u8>,
    /// HMAC key for refresh tokens; must differ from `access_secret`
    pub refresh_secret: Vec<u8>,
    /// Access token lifetime in seconds
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: Vec::new(),
            refresh_secret: Vec::new(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        }
    }
}

impl AuthConfig {
    /// Config with explicit secrets
    pub fn with_secrets(access: impl Into<Vec<u8>>, refresh: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access.into(),
            refresh_secret: refresh.into(),
            ..Default::default()
        }
    }

    /// Create config with random per-process secrets
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut access = [0u8; 32];
        let mut refresh = [0u8; 32];
        rand::rng().fill_bytes(&mut access);
        rand::rng().fill_bytes(&mut refresh);
        Self::with_secrets(access, refresh)
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Override the token lifetimes
    pub fn with_ttls(mut self, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }

    /// Reject configurations that would sign tokens insecurely
    pub fn validate(&self) -> AuthResult<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AuthError::Internal("JWT secrets are not configured".into()));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AuthError::Internal(
                "Access and refresh secrets must differ".into(),
            ));
        }
        for (name, ttl) in [
            ("access", self.access_ttl_secs),
            ("refresh", self.refresh_ttl_secs),
        ] {
            if !(1..=MAX_TTL_SECS).contains(&ttl) {
                return Err(AuthError::Internal(format!(
                    "The {name} token lifetime must be between 1 and {MAX_TTL_SECS} seconds"
                )));
            }
        }
        if self.access_secret.len() < 32 || self.refresh_secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}
