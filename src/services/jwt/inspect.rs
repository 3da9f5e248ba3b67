//! Unverified inspection of a token (header + payload only).
//!
//! Nothing here checks a signature: a successful parse proves the token is
//! well-formed, never that it is authentic.

use tracing::error;

use crate::error::JwtError;
use crate::services::jwt::engine::{Claims, JwtEngine, UnverifiedToken};

/// Truncate after the last `.`, keeping it: `h.p.s` -> `h.p.`.
/// `None` when the string has no `.` at all.
pub fn strip_signature(token: &str) -> Option<&str> {
    token.rfind('.').map(|i| &token[..=i])
}

/// Parse header and claims, ignoring the signature segment.
pub fn inspect(engine: &dyn JwtEngine, token: Option<&str>) -> Result<UnverifiedToken, JwtError> {
    let token = token.ok_or(JwtError::Absent)?;
    let unsigned = strip_signature(token)
        .ok_or_else(|| JwtError::malformed("token has no '.' separator"))?;

    engine.parse_unverified(unsigned)
}

/// `true` when a syntactically valid token is present.
pub fn contains_token(engine: &dyn JwtEngine, token: Option<&str>) -> bool {
    match inspect(engine, token) {
        Ok(_) => true,
        Err(JwtError::Absent) => false,
        Err(e) => {
            error!(error = %e, "provided request does not contain a valid JWT");
            false
        }
    }
}

/// String value of one claim. Parse failures collapse into `None`.
pub fn get_claim(engine: &dyn JwtEngine, token: Option<&str>, claim: &str) -> Option<String> {
    let token = token.filter(|t| !t.is_empty())?;
    match inspect(engine, Some(token)) {
        Ok(parsed) => parsed.claim_str(claim).map(str::to_owned),
        Err(e) => {
            error!(error = %e, claim, "unable to read JWT payload value");
            None
        }
    }
}

/// Whole claim object, unverified.
pub fn unverified_claims(engine: &dyn JwtEngine, token: Option<&str>) -> Option<Claims> {
    match inspect(engine, token) {
        Ok(parsed) => Some(parsed.claims),
        Err(JwtError::Absent) => None,
        Err(e) => {
            error!(error = %e, "unable to read JWT payload");
            None
        }
    }
}
