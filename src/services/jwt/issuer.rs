use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;

use crate::error::JwtError;
use crate::services::jwt::builder::{self, TokenBuilder};
use crate::services::jwt::claims::ClaimSet;
use crate::services::jwt::engine::JwtEngine;

/// Issues HMAC-signed tokens with a fixed secret, algorithm and lifetime.
#[derive(Clone)]
pub struct TokenIssuer {
    engine: Arc<dyn JwtEngine>,
    secret: String,
    algorithm: Algorithm,
    ttl_seconds: u64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenIssuer {
    /// `algorithm` must name an HMAC algorithm; `None` means HS256.
    pub fn new(
        engine: Arc<dyn JwtEngine>,
        secret: String,
        algorithm: Option<&str>,
        ttl_seconds: u64,
    ) -> Result<Self, JwtError> {
        let algorithm = match algorithm {
            Some(name) => builder::parse_algorithm(name)?,
            None => builder::DEFAULT_ALGORITHM,
        };

        Ok(Self {
            engine,
            secret,
            algorithm,
            ttl_seconds,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign `claims`, expiring `ttl_seconds` from now. A zero TTL issues a token without `exp`.
    pub fn issue(&self, claims: &ClaimSet) -> Result<String, JwtError> {
        let mut token = TokenBuilder::new()
            .claims(claims)
            .secret(self.secret.clone())
            .with_algorithm(self.algorithm);

        if self.ttl_seconds > 0 {
            let expires_at = i64::try_from(self.ttl_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl));
            if let Some(exp) = expires_at {
                token = token.expires_at(exp);
            }
        }

        token.build(self.engine.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::jwt::engine::JsonWebTokenEngine;
    use crate::services::jwt::keys::VerificationKey;
    use crate::services::jwt::verify;

    #[test]
    fn issued_token_expires_after_ttl() {
        let issuer = TokenIssuer::new(Arc::new(JsonWebTokenEngine), "k".into(), None, 600).unwrap();
        let mut claims = ClaimSet::new();
        claims.insert("sub".into(), "alice".into());

        assert_eq!(issuer.ttl_seconds(), 600);
        let token = issuer.issue(&claims).unwrap();
        let verified =
            verify::verify_token(&JsonWebTokenEngine, Some(&token), &VerificationKey::secret("k"))
                .unwrap();

        let iat = verified["iat"].as_i64().unwrap();
        let exp = verified["exp"].as_i64().unwrap();
        assert!((599..=600).contains(&(exp - iat)));
        assert_eq!(verified["sub"], "alice");
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let err = TokenIssuer::new(Arc::new(JsonWebTokenEngine), "k".into(), Some("HS999"), 60)
            .unwrap_err();
        assert!(matches!(err, JwtError::UnknownAlgorithm(_)));
    }
}
