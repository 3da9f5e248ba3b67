//! Factories: build JWT services and keys from `JwtConfig`.

use jsonwebtoken::DecodingKey;
use tracing::warn;

use crate::config::{ConfigError, JwtConfig};
use crate::services::jwt::issuer::TokenIssuer;
use crate::services::jwt::keys::{KeyFamily, PublicKey, VerificationKey};
use crate::services::jwt::service::JwtService;

pub fn build_service(config: &JwtConfig) -> JwtService {
    let service = JwtService::new();
    match &config.header_name {
        Some(name) => service.header_name(name.clone()),
        None => service,
    }
}

/// A configured public key takes precedence over a shared secret.
pub fn build_verification_key(config: &JwtConfig) -> Result<VerificationKey, ConfigError> {
    if let Some(pem) = &config.public_key_pem {
        let pem = pem.as_bytes();
        let decoded = match config.public_key_family {
            KeyFamily::Rsa => DecodingKey::from_rsa_pem(pem).map(PublicKey::rsa),
            KeyFamily::Ec => DecodingKey::from_ec_pem(pem).map(PublicKey::ec),
            KeyFamily::Ed => DecodingKey::from_ed_pem(pem).map(PublicKey::ed),
        };

        let key = decoded.map_err(|e| {
            warn!(error = %e, family = ?config.public_key_family, "failed to parse JWT public key PEM");
            ConfigError::Invalid("JWT_PUBLIC_KEY_PEM")
        })?;
        return Ok(key.into());
    }

    config
        .secret
        .clone()
        .map(VerificationKey::Secret)
        .ok_or(ConfigError::Missing("JWT_SECRET"))
}

pub fn build_issuer(config: &JwtConfig) -> Result<TokenIssuer, ConfigError> {
    let secret = config
        .secret
        .clone()
        .ok_or(ConfigError::Missing("JWT_SECRET"))?;

    TokenIssuer::new(
        build_service(config).shared_engine(),
        secret,
        config.algorithm.as_deref(),
        config.ttl_seconds,
    )
    .map_err(|e| {
        warn!(error = %e, "unusable JWT signing algorithm");
        ConfigError::Invalid("JWT_ALGORITHM")
    })
}
