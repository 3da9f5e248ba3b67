use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use super::VerifiedClaims;

/// Handler-side access to `VerifiedClaims`.
/// Relies on the JWT guard having inserted them; 401 otherwise (route not guarded).
pub struct VerifiedClaimsExtractor(pub VerifiedClaims);

impl<S> FromRequestParts<S> for VerifiedClaimsExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedClaims>()
            .cloned()
            .map(VerifiedClaimsExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
