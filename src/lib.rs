//! Locate, inspect, verify and build JSON Web Tokens carried in HTTP request headers.
//!
//! - `services::jwt`: the stateless token operations (`JwtService` and the
//!   functions behind it), pluggable through `JwtEngine`
//! - `middleware::jwt` / `extractors`: axum wiring for guarded routes
//! - `config`: environment-driven settings

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod services;

pub use config::{ConfigError, JwtConfig};
pub use error::{AppError, JwtError};
pub use services::jwt::{
    ClaimCheck, ClaimSet, Claims, JsonWebTokenEngine, JwtEngine, JwtService, KeyFamily,
    PublicKey, TokenBuilder, TokenIssuer, UnverifiedToken, VerificationKey,
};
