/*
 * Responsibility
 * - axum middleware built on the JWT services (re-export)
 */
pub mod jwt;
