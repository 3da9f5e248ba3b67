/*
 * Responsibility
 * - Read JWT settings from the environment (.env supported via dotenvy)
 * - Validate what can be validated without touching key material
 */
use std::fmt;

use crate::services::jwt::claims::ClaimSet;
use crate::services::jwt::keys::KeyFamily;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct JwtConfig {
    // Custom header carrying the raw token; Authorization: Bearer is the fallback
    pub header_name: Option<String>,
    // Shared HMAC secret (verification and issuing)
    pub secret: Option<String>,
    // Signing algorithm name for issued tokens (HS256 when unset)
    pub algorithm: Option<String>,
    pub public_key_pem: Option<String>,
    pub public_key_family: KeyFamily,
    // Claims every guarded request must carry
    pub required_claims: ClaimSet,
    pub ttl_seconds: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("header_name", &self.header_name)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("public_key_pem", &self.public_key_pem.is_some())
            .field("public_key_family", &self.public_key_family)
            .field("required_claims", &self.required_claims)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup` (empty values count as unset).
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let header_name = var("JWT_HEADER_NAME");
        let secret = var("JWT_SECRET");
        let algorithm = var("JWT_ALGORITHM");

        let public_key_pem = var("JWT_PUBLIC_KEY_PEM").map(|pem| pem.replace("\\n", "\n"));

        let public_key_family = match var("JWT_PUBLIC_KEY_TYPE") {
            Some(name) => {
                KeyFamily::parse(&name).ok_or(ConfigError::Invalid("JWT_PUBLIC_KEY_TYPE"))?
            }
            None => KeyFamily::Rsa,
        };

        let required_claims = match var("JWT_REQUIRED_CLAIMS") {
            Some(raw) => parse_claim_pairs(&raw).ok_or(ConfigError::Invalid("JWT_REQUIRED_CLAIMS"))?,
            None => ClaimSet::new(),
        };

        let ttl_seconds = match var("JWT_TTL_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("JWT_TTL_SECONDS"))?,
            None => 3600, // 1 hour
        };

        Ok(Self {
            header_name,
            secret,
            algorithm,
            public_key_pem,
            public_key_family,
            required_claims,
            ttl_seconds,
        })
    }
}

/// `role=admin, tenant=acme` -> {role: admin, tenant: acme}
pub fn parse_claim_pairs(raw: &str) -> Option<ClaimSet> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_owned(), value.trim().to_owned()))
        })
        .collect()
}
