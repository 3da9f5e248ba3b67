//! Claim expectations against an unverified token.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::JwtError;
use crate::services::jwt::engine::{Claims, JwtEngine};
use crate::services::jwt::inspect;

/// Claim name -> expected (or to-be-issued) string value.
pub type ClaimSet = BTreeMap<String, String>;

/// Outcome of comparing expectations against a request's token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimCheck {
    /// No token at all.
    Absent,
    Matched,
    /// First claim (in name order) whose value differed, was missing or was not a string.
    Mismatched { claim: String },
}

impl ClaimCheck {
    /// Compatibility reading: an absent token passes.
    pub fn passes(&self) -> bool {
        matches!(self, Self::Absent | Self::Matched)
    }
}

/// First expected claim not carried as an equal string value.
pub fn first_mismatch<'a>(claims: &Claims, expected: &'a ClaimSet) -> Option<&'a str> {
    expected
        .iter()
        .find(|(name, value)| claims.get(name.as_str()).and_then(Value::as_str) != Some(value.as_str()))
        .map(|(name, _)| name.as_str())
}

pub fn check(
    engine: &dyn JwtEngine,
    token: Option<&str>,
    expected: &ClaimSet,
) -> Result<ClaimCheck, JwtError> {
    if token.is_none() {
        return Ok(ClaimCheck::Absent);
    }

    let parsed = inspect::inspect(engine, token)?;
    Ok(match first_mismatch(&parsed.claims, expected) {
        Some(claim) => ClaimCheck::Mismatched {
            claim: claim.to_owned(),
        },
        None => ClaimCheck::Matched,
    })
}

/// Boolean form: absent token -> `true`, mismatch or parse failure -> `false`.
pub fn check_claims(engine: &dyn JwtEngine, token: Option<&str>, expected: &ClaimSet) -> bool {
    match check(engine, token, expected) {
        Ok(ClaimCheck::Mismatched { claim }) => {
            debug!(claim = %claim, "JWT claim value does not match");
            false
        }
        Ok(outcome) => outcome.passes(),
        Err(e) => {
            error!(error = %e, "unable to check JWT payload claims");
            false
        }
    }
}
