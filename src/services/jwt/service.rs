use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

use crate::error::JwtError;
use crate::services::jwt::builder;
use crate::services::jwt::claims::{self, ClaimCheck, ClaimSet};
use crate::services::jwt::engine::{Claims, JsonWebTokenEngine, JwtEngine, UnverifiedToken};
use crate::services::jwt::inspect;
use crate::services::jwt::keys::VerificationKey;
use crate::services::jwt::locator;
use crate::services::jwt::verify;

/// Request-level JWT operations.
///
/// Stateless apart from configuration: every call locates the token in the
/// given headers first, then inspects, checks or verifies it.
/// The boolean / `Option` methods swallow failures (they are logged);
/// the `Result` methods keep absent, malformed and rejected tokens apart.
#[derive(Clone)]
pub struct JwtService {
    engine: Arc<dyn JwtEngine>,
    header_name: Option<String>,
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("header_name", &self.header_name)
            .finish_non_exhaustive()
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_engine(Arc::new(JsonWebTokenEngine::new()))
    }

    pub fn with_engine(engine: Arc<dyn JwtEngine>) -> Self {
        Self {
            engine,
            header_name: None,
        }
    }

    /// Look in this header before falling back to `Authorization: Bearer`.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = Some(name.into());
        self
    }

    pub fn engine(&self) -> &dyn JwtEngine {
        self.engine.as_ref()
    }

    pub fn shared_engine(&self) -> Arc<dyn JwtEngine> {
        Arc::clone(&self.engine)
    }

    pub fn locate(&self, headers: &HeaderMap) -> Option<String> {
        locator::locate_token(headers, self.header_name.as_deref())
    }

    // --- boolean / optional forms ---

    pub fn contains_token(&self, headers: &HeaderMap) -> bool {
        inspect::contains_token(self.engine(), self.locate(headers).as_deref())
    }

    /// Absent token passes; see `check_claims` for the three-way result.
    pub fn check_payload_values(&self, headers: &HeaderMap, expected: &ClaimSet) -> bool {
        claims::check_claims(self.engine(), self.locate(headers).as_deref(), expected)
    }

    pub fn payload_value(&self, headers: &HeaderMap, claim: &str) -> Option<String> {
        inspect::get_claim(self.engine(), self.locate(headers).as_deref(), claim)
    }

    pub fn check_signature(&self, headers: &HeaderMap, key: &VerificationKey) -> bool {
        verify::verify(self.engine(), self.locate(headers).as_deref(), key)
    }

    // --- tagged forms ---

    pub fn inspect_request(&self, headers: &HeaderMap) -> Result<UnverifiedToken, JwtError> {
        inspect::inspect(self.engine(), self.locate(headers).as_deref())
    }

    pub fn check_claims(
        &self,
        headers: &HeaderMap,
        expected: &ClaimSet,
    ) -> Result<ClaimCheck, JwtError> {
        claims::check(self.engine(), self.locate(headers).as_deref(), expected)
    }

    pub fn verify_request(
        &self,
        headers: &HeaderMap,
        key: &VerificationKey,
    ) -> Result<Claims, JwtError> {
        verify::verify_token(self.engine(), self.locate(headers).as_deref(), key)
    }

    /// Unknown algorithm names fall back to HS256 (logged).
    pub fn build_token(
        &self,
        claims: &ClaimSet,
        expires_at: Option<DateTime<Utc>>,
        algorithm: Option<&str>,
        secret: Option<&str>,
    ) -> Result<String, JwtError> {
        builder::build_token(self.engine(), claims, expires_at, algorithm, secret)
    }
}
