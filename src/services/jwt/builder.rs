//! Token construction from a claim set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use serde_json::Value;
use tracing::warn;

use crate::error::JwtError;
use crate::services::jwt::claims::ClaimSet;
use crate::services::jwt::engine::{Claims, JwtEngine};
use crate::services::jwt::keys;

pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Resolve an HMAC algorithm by its JOSE name (`HS256`, `HS384`, `HS512`).
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    let algorithm =
        Algorithm::from_str(name).map_err(|_| JwtError::UnknownAlgorithm(name.to_owned()))?;
    if !keys::is_hmac(algorithm) {
        return Err(JwtError::UnsupportedAlgorithm(algorithm));
    }
    Ok(algorithm)
}

/// Like `parse_algorithm`, but anything unusable falls back to HS256.
pub fn algorithm_or_default(name: Option<&str>) -> Algorithm {
    match name.filter(|n| !n.is_empty()) {
        None => DEFAULT_ALGORITHM,
        Some(name) => parse_algorithm(name).unwrap_or_else(|e| {
            warn!(error = %e, algorithm = name, "falling back to default signing algorithm");
            DEFAULT_ALGORITHM
        }),
    }
}

#[derive(Clone, Default)]
pub struct TokenBuilder {
    claims: ClaimSet,
    expires_at: Option<DateTime<Utc>>,
    algorithm: Option<Algorithm>,
    secret: Option<String>,
}

impl fmt::Debug for TokenBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBuilder")
            .field("claims", &self.claims)
            .field("expires_at", &self.expires_at)
            .field("algorithm", &self.algorithm)
            .field("signed", &self.secret.is_some())
            .finish()
    }
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claims(mut self, claims: &ClaimSet) -> Self {
        self.claims
            .extend(claims.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Strict: unknown or non-HMAC names are an error.
    pub fn algorithm(mut self, name: &str) -> Result<Self, JwtError> {
        self.algorithm = Some(parse_algorithm(name)?);
        Ok(self)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Sign with this secret. Without one the token is unsigned (`h.p.`).
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn build(&self, engine: &dyn JwtEngine) -> Result<String, JwtError> {
        let claims = self.claim_object(Utc::now());

        match &self.secret {
            Some(secret) => {
                let algorithm = self.algorithm.unwrap_or(DEFAULT_ALGORITHM);
                engine.sign(&claims, secret, algorithm)
            }
            None => engine.encode_unsigned(&claims),
        }
    }

    fn claim_object(&self, issued_at: DateTime<Utc>) -> Claims {
        let mut claims = Claims::new();
        claims.insert("iat".to_owned(), Value::from(issued_at.timestamp()));
        for (name, value) in &self.claims {
            claims.insert(name.clone(), Value::String(value.clone()));
        }
        if let Some(exp) = self.expires_at {
            claims.insert("exp".to_owned(), Value::from(exp.timestamp()));
        }
        claims
    }
}

/// One-call construction with lenient algorithm resolution.
pub fn build_token(
    engine: &dyn JwtEngine,
    claims: &ClaimSet,
    expires_at: Option<DateTime<Utc>>,
    algorithm: Option<&str>,
    secret: Option<&str>,
) -> Result<String, JwtError> {
    let mut builder = TokenBuilder::new().claims(claims);
    if let Some(exp) = expires_at {
        builder = builder.expires_at(exp);
    }
    if let Some(secret) = secret {
        builder = builder
            .secret(secret)
            .with_algorithm(algorithm_or_default(algorithm));
    }
    builder.build(engine)
}
