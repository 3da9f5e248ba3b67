//! Request-level behaviour of `JwtService`: locate -> inspect / check / verify / build.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::{HeaderMap, HeaderValue};
use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;

use jwt_util::{
    ClaimCheck, ClaimSet, Claims, JsonWebTokenEngine, JwtEngine, JwtError, JwtService,
    UnverifiedToken, VerificationKey,
};

const SECRET: &str = "correct horse battery staple";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn claim_set(pairs: &[(&str, &str)]) -> ClaimSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

fn signed(service: &JwtService, claims: &ClaimSet, secret: &str) -> String {
    service.build_token(claims, None, None, Some(secret)).unwrap()
}

#[test]
fn bearer_token_is_located_and_inspected_without_verification() {
    init_tracing();
    let service = JwtService::new();
    let token = signed(&service, &claim_set(&[("sub", "alice")]), SECRET);
    let headers = bearer(&token);

    assert_eq!(service.locate(&headers).as_deref(), Some(token.as_str()));
    assert!(service.contains_token(&headers));

    // Inspection succeeds whatever the signature says; verification does not.
    assert!(!service.check_signature(&headers, &VerificationKey::secret("wrong secret")));
    assert!(service.check_signature(&headers, &VerificationKey::secret(SECRET)));
}

#[test]
fn tampered_signature_still_inspects_but_fails_verification() {
    let service = JwtService::new();
    let token = signed(&service, &claim_set(&[("sub", "alice")]), SECRET);
    let (unsigned, _) = token.rsplit_once('.').unwrap();
    let tampered = format!("{}.AAAA", unsigned);
    let headers = bearer(&tampered);

    assert!(service.contains_token(&headers));
    assert!(matches!(
        service.verify_request(&headers, &VerificationKey::secret(SECRET)),
        Err(JwtError::VerificationFailed(_))
    ));
}

#[test]
fn absent_token_outcomes() {
    let service = JwtService::new();
    let headers = HeaderMap::new();
    let key = VerificationKey::secret(SECRET);

    assert!(!service.contains_token(&headers));
    assert!(service.check_payload_values(&headers, &claim_set(&[("role", "admin")])));
    assert_eq!(service.payload_value(&headers, "sub"), None);
    assert!(!service.check_signature(&headers, &key));

    assert!(matches!(service.inspect_request(&headers), Err(JwtError::Absent)));
    assert_eq!(
        service.check_claims(&headers, &claim_set(&[("role", "admin")])).unwrap(),
        ClaimCheck::Absent
    );
    assert!(service.verify_request(&headers, &key).unwrap_err().is_absent());
}

#[test]
fn malformed_token_outcomes() {
    let service = JwtService::new();
    let headers = bearer("not-a-jwt");

    assert!(!service.contains_token(&headers));
    assert!(!service.check_payload_values(&headers, &ClaimSet::new()));
    assert!(matches!(
        service.inspect_request(&headers),
        Err(JwtError::Malformed(_))
    ));
    assert!(matches!(
        service.verify_request(&headers, &VerificationKey::secret(SECRET)),
        Err(JwtError::Malformed(_))
    ));
}

#[test]
fn unsigned_build_round_trips_every_claim() {
    let service = JwtService::new();
    let claims = claim_set(&[
        ("sub", "alice"),
        ("http://wso2.org/claims/enduser", "admin@carbon.super"),
        ("empty", ""),
    ]);
    let token = service.build_token(&claims, None, None, None).unwrap();
    assert!(token.ends_with('.'));

    let headers = bearer(&token);
    for (name, value) in &claims {
        assert_eq!(service.payload_value(&headers, name).as_ref(), Some(value));
    }
    assert!(service.check_payload_values(&headers, &claims));
    assert!(service.check_payload_values(&headers, &ClaimSet::new()));
}

#[test]
fn claim_mismatch_short_circuits() {
    let service = JwtService::new();
    let token = service
        .build_token(&claim_set(&[("a", "1"), ("b", "2")]), None, None, None)
        .unwrap();
    let headers = bearer(&token);

    let outcome = service
        .check_claims(&headers, &claim_set(&[("a", "x"), ("b", "y")]))
        .unwrap();
    assert_eq!(outcome, ClaimCheck::Mismatched { claim: "a".into() });
    assert!(!service.check_payload_values(&headers, &claim_set(&[("b", "2"), ("c", "3")])));
}

#[test]
fn custom_header_is_preferred_over_authorization() {
    let service = JwtService::new().header_name("X-Auth-Token");
    let from_custom = service
        .build_token(&claim_set(&[("src", "custom")]), None, None, None)
        .unwrap();
    let from_bearer = service
        .build_token(&claim_set(&[("src", "bearer")]), None, None, None)
        .unwrap();

    let mut headers = bearer(&from_bearer);
    headers.insert("x-auth-token", HeaderValue::from_str(&from_custom).unwrap());

    assert_eq!(service.payload_value(&headers, "src").as_deref(), Some("custom"));

    headers.remove("x-auth-token");
    assert_eq!(service.payload_value(&headers, "src").as_deref(), Some("bearer"));
}

#[test]
fn unknown_algorithm_name_falls_back_to_hs256() {
    init_tracing();
    let service = JwtService::new();
    let token = service
        .build_token(
            &claim_set(&[("sub", "alice")]),
            None,
            Some("not-a-real-algo"),
            Some(SECRET),
        )
        .unwrap();

    assert_eq!(jsonwebtoken::decode_header(&token).unwrap().alg, Algorithm::HS256);
    assert!(service.check_signature(&bearer(&token), &VerificationKey::secret(SECRET)));
}

#[test]
fn named_hmac_algorithms_verify_with_the_same_secret() {
    let service = JwtService::new();
    for name in ["HS256", "HS384", "HS512"] {
        let token = service
            .build_token(&claim_set(&[("sub", "alice")]), None, Some(name), Some(SECRET))
            .unwrap();
        let headers = bearer(&token);
        let verified = service
            .verify_request(&headers, &VerificationKey::secret(SECRET))
            .unwrap();
        assert_eq!(verified["sub"], "alice");
        assert!(!service.check_signature(&headers, &VerificationKey::secret("other")));
    }
}

#[test]
fn expiration_is_enforced_when_present() {
    let service = JwtService::new();
    let key = VerificationKey::secret(SECRET);
    let claims = claim_set(&[("sub", "alice")]);

    let expired = service
        .build_token(&claims, Some(Utc::now() - Duration::hours(1)), None, Some(SECRET))
        .unwrap();
    assert!(!service.check_signature(&bearer(&expired), &key));
    // Unverified inspection does not look at exp.
    assert!(service.contains_token(&bearer(&expired)));

    let fresh = service
        .build_token(&claims, Some(Utc::now() + Duration::hours(1)), None, Some(SECRET))
        .unwrap();
    assert!(service.check_signature(&bearer(&fresh), &key));
}

#[test]
fn token_expired_seconds_ago_fails_verification() {
    let service = JwtService::new();
    let expired = service
        .build_token(
            &claim_set(&[("sub", "alice")]),
            Some(Utc::now() - Duration::seconds(30)),
            None,
            Some(SECRET),
        )
        .unwrap();
    assert!(!service.check_signature(&bearer(&expired), &VerificationKey::secret(SECRET)));
}

#[test]
fn empty_secret_is_refused() {
    let service = JwtService::new();
    let err = service
        .build_token(&claim_set(&[("sub", "alice")]), None, None, Some(""))
        .unwrap_err();
    assert!(matches!(err, JwtError::Signing(_)));

    let token = signed(&service, &claim_set(&[("sub", "alice")]), SECRET);
    assert!(!service.check_signature(&bearer(&token), &VerificationKey::secret("")));
}

#[test]
fn unsigned_token_never_verifies() {
    let service = JwtService::new();
    let token = service
        .build_token(&claim_set(&[("sub", "alice")]), None, None, None)
        .unwrap();
    assert!(!service.check_signature(&bearer(&token), &VerificationKey::secret(SECRET)));
}

/// Delegates to the default engine and counts calls.
#[derive(Default)]
struct CountingEngine {
    inner: JsonWebTokenEngine,
    calls: AtomicUsize,
}

impl JwtEngine for CountingEngine {
    fn parse_unverified(&self, token: &str) -> Result<UnverifiedToken, JwtError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse_unverified(token)
    }

    fn parse_and_verify(&self, token: &str, key: &VerificationKey) -> Result<Claims, JwtError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse_and_verify(token, key)
    }

    fn sign(&self, claims: &Claims, secret: &str, algorithm: Algorithm) -> Result<String, JwtError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign(claims, secret, algorithm)
    }
}

#[test]
fn service_routes_every_operation_through_its_engine() {
    let engine = Arc::new(CountingEngine::default());
    let service = JwtService::with_engine(engine.clone());

    let token = signed(&service, &claim_set(&[("sub", "alice")]), SECRET);
    let headers = bearer(&token);
    assert!(service.contains_token(&headers));
    assert!(service.check_signature(&headers, &VerificationKey::secret(SECRET)));

    assert_eq!(engine.calls.load(Ordering::SeqCst), 3);

    // No token: the engine is never consulted.
    assert!(!service.contains_token(&HeaderMap::new()));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
}
