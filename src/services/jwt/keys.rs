//! Verification key material.
//!
//! Keys arrive already parsed (`DecodingKey`); PEM loading belongs to the
//! configuration factory, not to the verifier.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey};

const HMAC_ALGORITHMS: &[Algorithm] = &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
const RSA_ALGORITHMS: &[Algorithm] = &[
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];
const EC_ALGORITHMS: &[Algorithm] = &[Algorithm::ES256, Algorithm::ES384];
const ED_ALGORITHMS: &[Algorithm] = &[Algorithm::EdDSA];

/// Asymmetric key family. Decides which `alg` header values a public key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    Ec,
    Ed,
}

impl KeyFamily {
    pub fn algorithms(self) -> &'static [Algorithm] {
        match self {
            Self::Rsa => RSA_ALGORITHMS,
            Self::Ec => EC_ALGORITHMS,
            Self::Ed => ED_ALGORITHMS,
        }
    }

    /// `rsa` / `ec` / `ed` (also `ecdsa`, `eddsa`, `ed25519`), case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rsa" => Some(Self::Rsa),
            "ec" | "ecdsa" => Some(Self::Ec),
            "ed" | "eddsa" | "ed25519" => Some(Self::Ed),
            _ => None,
        }
    }
}

/// A public key handle tagged with its family.
#[derive(Clone)]
pub struct PublicKey {
    family: KeyFamily,
    key: DecodingKey,
}

impl PublicKey {
    pub fn rsa(key: DecodingKey) -> Self {
        Self {
            family: KeyFamily::Rsa,
            key,
        }
    }

    pub fn ec(key: DecodingKey) -> Self {
        Self {
            family: KeyFamily::Ec,
            key,
        }
    }

    pub fn ed(key: DecodingKey) -> Self {
        Self {
            family: KeyFamily::Ed,
            key,
        }
    }

    pub fn family(&self) -> KeyFamily {
        self.family
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// Key used by the signature verifier: a public key or a shared HMAC secret.
#[derive(Clone)]
pub enum VerificationKey {
    Public(PublicKey),
    Secret(String),
}

impl VerificationKey {
    pub fn secret(secret: impl Into<String>) -> Self {
        Self::Secret(secret.into())
    }

    /// An empty shared secret is never usable key material.
    pub fn is_empty_secret(&self) -> bool {
        matches!(self, Self::Secret(secret) if secret.is_empty())
    }

    /// Algorithms a token may declare to be checked with this key.
    pub fn algorithms(&self) -> &'static [Algorithm] {
        match self {
            Self::Public(key) => key.family().algorithms(),
            Self::Secret(_) => HMAC_ALGORITHMS,
        }
    }

    pub fn decoding_key(&self) -> DecodingKey {
        match self {
            Self::Public(key) => key.decoding_key().clone(),
            Self::Secret(secret) => DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl From<PublicKey> for VerificationKey {
    fn from(key: PublicKey) -> Self {
        Self::Public(key)
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Public(key) => f.debug_tuple("Public").field(key).finish(),
            Self::Secret(_) => f.write_str("Secret(..)"),
        }
    }
}

/// HMAC algorithms are the only ones a shared secret can sign with.
pub fn is_hmac(algorithm: Algorithm) -> bool {
    HMAC_ALGORITHMS.contains(&algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names_parse_case_insensitively() {
        assert_eq!(KeyFamily::parse("RSA"), Some(KeyFamily::Rsa));
        assert_eq!(KeyFamily::parse(" ec "), Some(KeyFamily::Ec));
        assert_eq!(KeyFamily::parse("Ed25519"), Some(KeyFamily::Ed));
        assert_eq!(KeyFamily::parse("dsa"), None);
    }

    #[test]
    fn secret_debug_hides_material() {
        let key = VerificationKey::secret("top-secret");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("top-secret"));
    }

    #[test]
    fn secret_key_accepts_only_hmac() {
        let key = VerificationKey::secret("s");
        assert!(key.algorithms().iter().all(|alg| is_hmac(*alg)));
        assert!(!is_hmac(Algorithm::RS256));
    }
}
