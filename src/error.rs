/*
 * Responsibility
 * - JwtError: the tagged failure of every token operation (absent / malformed / rejected)
 * - AppError: what the axum adapter answers with (HTTP status + JSON error body)
 * - Classification of jsonwebtoken errors into the two failure families
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonwebtoken::Algorithm;
use jsonwebtoken::errors::ErrorKind;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwtError {
    /// No token in the request. A normal outcome, not a failure of the token itself.
    #[error("no token found in request headers")]
    Absent,

    /// Wrong segment count, bad base64url, bad JSON.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Well-formed, but the signature (or exp/nbf/alg) was rejected.
    #[error("token verification failed: {0}")]
    VerificationFailed(#[source] jsonwebtoken::errors::Error),

    #[error("claim mismatch: {0}")]
    ClaimMismatch(String),

    #[error("unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("algorithm {0:?} cannot sign with a shared secret")]
    UnsupportedAlgorithm(Algorithm),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("failed to encode token segment: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl JwtError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Split engine errors into "not a token" vs "a token we refuse".
    pub fn from_verification(e: jsonwebtoken::errors::Error) -> Self {
        let malformed = matches!(
            e.kind(),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_)
        );
        if malformed {
            Self::Malformed(e.to_string())
        } else {
            Self::VerificationFailed(e)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Absent | JwtError::Malformed(_) | JwtError::VerificationFailed(_) => {
                AppError::Unauthorized
            }
            JwtError::ClaimMismatch(_) => AppError::Forbidden,
            // Signing-side failures never come from the client.
            _ => AppError::Internal,
        }
    }
}
