//! Credential services
//!
//! Argon2 work runs on the blocking pool so it never stalls request tasks.

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::AuthResult;

/// Hash a policy-checked password for storage
pub async fn hash_password(password: ClearTextPassword) -> AuthResult<HashedPassword> {
    Ok(password.hash_blocking().await?)
}

/// Constant-time check of a sign-in password against the stored hash
pub async fn verify_password(plaintext: &str, hash: &HashedPassword) -> AuthResult<bool> {
    let candidate = ClearTextPassword::for_verification(plaintext.to_string());
    Ok(hash.clone().verify_blocking(candidate).await?)
}
