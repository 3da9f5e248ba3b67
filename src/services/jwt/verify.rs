//! Signature verification against a public key or a shared secret.

use tracing::debug;

use crate::error::JwtError;
use crate::services::jwt::engine::{Claims, JwtEngine};
use crate::services::jwt::keys::VerificationKey;

/// Verify the full token and return its claims.
pub fn verify_token(
    engine: &dyn JwtEngine,
    token: Option<&str>,
    key: &VerificationKey,
) -> Result<Claims, JwtError> {
    let token = token.ok_or(JwtError::Absent)?;
    engine.parse_and_verify(token, key)
}

/// `true` only for a present token whose signature checks out.
pub fn verify(engine: &dyn JwtEngine, token: Option<&str>, key: &VerificationKey) -> bool {
    match verify_token(engine, token, key) {
        Ok(_) => true,
        Err(JwtError::Absent) => false,
        Err(e) => {
            debug!(error = %e, "JWT signature check failed");
            false
        }
    }
}
