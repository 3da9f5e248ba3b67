pub mod builder;
pub mod claims;
pub mod engine;
pub mod factory;
pub mod inspect;
pub mod issuer;
pub mod keys;
pub mod locator;
pub mod service;
pub mod verify;

pub use builder::TokenBuilder;
pub use claims::{ClaimCheck, ClaimSet};
pub use engine::{Claims, JsonWebTokenEngine, JwtEngine, UnverifiedToken};
pub use factory::{build_issuer, build_service, build_verification_key};
pub use issuer::TokenIssuer;
pub use keys::{KeyFamily, PublicKey, VerificationKey};
pub use locator::locate_token;
pub use service::JwtService;
