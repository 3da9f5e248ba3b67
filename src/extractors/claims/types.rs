/*
 * Responsibility
 * - The claims of a request whose token passed the guard
 * - The middleware verifies and stores it in request extensions; handlers only see this type
 */
use serde_json::Value;

use crate::services::jwt::engine::Claims;

/// Claims of a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims(pub Claims);

impl VerifiedClaims {
    pub fn new(claims: Claims) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    pub fn into_inner(self) -> Claims {
        self.0
    }
}
