//! Token Service
//!
//! HS256 JWTs. Access and refresh tokens are signed with separate secrets and
//! carry a `type` claim, so neither can stand in for the other.
//! Verification never errors: any failure is `None`, and the gate decides
//! what to answer.
//! Refresh re-reads the user, but an access token keeps the role and validity
//! it was issued with until it expires, even after a role change or deletion.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::{Email, Role};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
///
/// Serialized as `{userId, role?, email?, type, iat, exp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.user_id)
    }
}

/// Issues and verifies tokens
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            access_encoding: EncodingKey::from_secret(&config.access_secret),
            access_decoding: DecodingKey::from_secret(&config.access_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_secret),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            validation,
        }
    }

    /// Access token lifetime, reported to clients as `expiresIn`
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn generate_access_token(
        &self,
        user_id: UserId,
        role: Role,
        email: &Email,
    ) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let exp = expiry(now, self.access_ttl_secs)?;
        let claims = Claims {
            user_id: user_id.get(),
            role: Some(role.as_str().to_string()),
            email: Some(email.as_str().to_string()),
            token_type: TokenType::Access,
            iat: now,
            exp,
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.access_encoding,
        )?)
    }

    pub fn generate_refresh_token(&self, user_id: UserId) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let exp = expiry(now, self.refresh_ttl_secs)?;
        let claims = Claims {
            user_id: user_id.get(),
            role: None,
            email: None,
            token_type: TokenType::Refresh,
            iat: now,
            exp,
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.refresh_encoding,
        )?)
    }

    /// Signature, expiry (zero leeway) and `type == access`
    pub fn verify_access_token(&self, token: &str) -> Option<Claims> {
        self.verify(token, &self.access_decoding, TokenType::Access)
    }

    /// Signature, expiry (zero leeway) and `type == refresh`
    pub fn verify_refresh_token(&self, token: &str) -> Option<Claims> {
        self.verify(token, &self.refresh_decoding, TokenType::Refresh)
    }

    /// Read claims without checking the signature or expiry
    ///
    /// Diagnostic only; never use the result for authorization.
    pub fn decode_token(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }

    fn verify(&self, token: &str, key: &DecodingKey, expected: TokenType) -> Option<Claims> {
        match decode::<Claims>(token, key, &self.validation) {
            Ok(data) if data.claims.token_type == expected => Some(data.claims),
            Ok(_) => {
                tracing::debug!(expected = ?expected, "Token type mismatch");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                None
            }
        }
    }
}

fn expiry(now: i64, ttl_secs: i64) -> AuthResult<i64> {
    now.checked_add(ttl_secs)
        .ok_or_else(|| AuthError::Internal("Token expiry overflows".into()))
}
