/*!
 * Verified-claims extractor
 *
 * Public API:
 * - VerifiedClaims
 * - VerifiedClaimsExtractor
 */

mod core;
mod types;

pub use self::core::VerifiedClaimsExtractor;
pub use self::types::VerifiedClaims;
