//! JWT guard: locate + verify the request token, check required claims,
//! then hand `VerifiedClaims` to handlers through request extensions.

use std::fmt;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
};

use crate::config::{ConfigError, JwtConfig};
use crate::error::{AppError, JwtError};
use crate::extractors::VerifiedClaims;
use crate::services::jwt::claims::{self, ClaimSet};
use crate::services::jwt::engine::Claims;
use crate::services::jwt::factory;
use crate::services::jwt::keys::VerificationKey;
use crate::services::jwt::service::JwtService;

#[derive(Clone)]
pub struct JwtGuard {
    service: JwtService,
    key: Arc<VerificationKey>,
    required_claims: Arc<ClaimSet>,
}

impl fmt::Debug for JwtGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtGuard")
            .field("service", &self.service)
            .field("key", &self.key)
            .field("required_claims", &self.required_claims)
            .finish()
    }
}

impl JwtGuard {
    pub fn new(service: JwtService, key: VerificationKey) -> Self {
        Self {
            service,
            key: Arc::new(key),
            required_claims: Arc::new(ClaimSet::new()),
        }
    }

    pub fn require_claims(mut self, required: ClaimSet) -> Self {
        self.required_claims = Arc::new(required);
        self
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, ConfigError> {
        let key = factory::build_verification_key(config)?;
        Ok(Self::new(factory::build_service(config), key)
            .require_claims(config.required_claims.clone()))
    }

    /// Verified claims, or why the request must be turned away.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Claims, JwtError> {
        let verified = self.service.verify_request(headers, &self.key)?;

        if let Some(claim) = claims::first_mismatch(&verified, &self.required_claims) {
            return Err(JwtError::ClaimMismatch(claim.to_owned()));
        }

        Ok(verified)
    }
}

/// Put every route of `router` behind the guard.
///
/// ```ignore
/// let api = Router::new().route("/me", get(me));
/// let api = middleware::jwt::apply(api, JwtGuard::from_config(&config)?);
/// ```
pub fn apply<S>(router: Router<S>, guard: JwtGuard) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(guard, guard_middleware))
}

async fn guard_middleware(
    State(guard): State<JwtGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match guard.authorize(req.headers()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "request rejected by JWT guard");
            return Err(err.into());
        }
    };

    req.extensions_mut().insert(VerifiedClaims::new(claims));

    Ok(next.run(req).await)
}
