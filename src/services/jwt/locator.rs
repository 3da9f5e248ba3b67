/*
 * Responsibility
 * - Find the raw token string in request headers
 *   1. the configured custom header, returned as-is
 *   2. otherwise the first `Authorization: Bearer <token>` value
 * - Absence is a normal outcome (None), never an error
 */
use axum::http::{HeaderMap, header};

const BEARER: &str = "bearer";

pub fn locate_token(headers: &HeaderMap, header_name: Option<&str>) -> Option<String> {
    if let Some(name) = header_name.filter(|n| !n.is_empty()) {
        // Invalid header names simply never match. A present header is final,
        // even when its bytes are not visible ASCII.
        if let Some(value) = headers.get(name) {
            return Some(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
    }

    headers
        .get_all(header::AUTHORIZATION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(bearer_value)
}

// "Bearer xyz" / "BEARER xyz" / "bearer   xyz " -> "xyz"
fn bearer_value(value: &str) -> Option<String> {
    let prefix = value.get(..BEARER.len())?;
    if !prefix.eq_ignore_ascii_case(BEARER) {
        return None;
    }
    Some(value[BEARER.len()..].trim().to_owned())
}
