pub mod claims;

pub use claims::{VerifiedClaims, VerifiedClaimsExtractor};
