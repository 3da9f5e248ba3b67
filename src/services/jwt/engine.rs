//! JWT engine seam.
//!
//! Everything that actually decodes, verifies or signs a compact token goes
//! through `JwtEngine`. The components above it only locate strings, strip
//! segments and compare claims.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use crate::error::JwtError;
use crate::services::jwt::keys::{self, VerificationKey};

/// JSON object of a token payload (or header).
pub type Claims = Map<String, Value>;

/// Segment decoder that accepts both padded and unpadded base64url.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Header and claims of a token whose signature has not been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct UnverifiedToken {
    pub header: Claims,
    pub claims: Claims,
}

impl UnverifiedToken {
    /// String value of `name`. Non-string claims read as absent.
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }
}

pub trait JwtEngine: Send + Sync {
    /// Decode `header.payload.signature` without looking at the signature.
    fn parse_unverified(&self, token: &str) -> Result<UnverifiedToken, JwtError>;

    /// Decode and cryptographically verify a full compact token.
    fn parse_and_verify(&self, token: &str, key: &VerificationKey) -> Result<Claims, JwtError>;

    /// Sign `claims` with a shared secret.
    fn sign(&self, claims: &Claims, secret: &str, algorithm: Algorithm) -> Result<String, JwtError>;

    /// `{"alg":"none"}` token with an empty signature segment (`header.payload.`).
    fn encode_unsigned(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = serde_json::json!({ "alg": "none" });
        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        Ok(format!("{}.{}.", header, payload))
    }
}

/// Default engine backed by the `jsonwebtoken` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWebTokenEngine;

impl JsonWebTokenEngine {
    pub fn new() -> Self {
        Self
    }

    fn validation(key: &VerificationKey) -> Validation {
        let algorithms = key.algorithms();
        let mut validation = Validation::new(algorithms[0]);
        validation.algorithms = algorithms.to_vec();
        // exp/nbf are checked when the token carries them, never required.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        // No audience policy at this layer.
        validation.validate_aud = false;
        validation
    }
}

impl JwtEngine for JsonWebTokenEngine {
    fn parse_unverified(&self, token: &str) -> Result<UnverifiedToken, JwtError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header, payload, _signature] = segments.as_slice() else {
            return Err(JwtError::malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        Ok(UnverifiedToken {
            header: decode_segment(header, "header")?,
            claims: decode_segment(payload, "payload")?,
        })
    }

    fn parse_and_verify(&self, token: &str, key: &VerificationKey) -> Result<Claims, JwtError> {
        if key.is_empty_secret() {
            return Err(JwtError::VerificationFailed(ErrorKind::InvalidKeyFormat.into()));
        }

        let validation = Self::validation(key);
        let data = jsonwebtoken::decode::<Claims>(token, &key.decoding_key(), &validation)
            .map_err(JwtError::from_verification)?;

        Ok(data.claims)
    }

    fn sign(&self, claims: &Claims, secret: &str, algorithm: Algorithm) -> Result<String, JwtError> {
        if !keys::is_hmac(algorithm) {
            return Err(JwtError::UnsupportedAlgorithm(algorithm));
        }
        if secret.is_empty() {
            return Err(JwtError::Signing(ErrorKind::InvalidKeyFormat.into()));
        }

        let header = Header::new(algorithm);
        let key = EncodingKey::from_secret(secret.as_bytes());
        jsonwebtoken::encode(&header, claims, &key).map_err(JwtError::Signing)
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Claims, JwtError> {
    let bytes = LENIENT_URL_SAFE
        .decode(segment)
        .map_err(|e| JwtError::malformed(format!("{} is not base64url: {}", name, e)))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtError::malformed(format!("{} is not a JSON object", name))),
        Err(e) => Err(JwtError::malformed(format!("{} is not JSON: {}", name, e))),
    }
}
