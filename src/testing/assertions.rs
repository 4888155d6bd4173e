//! Assertion helpers for session cookie responses

use actix_web::{http::header::SET_COOKIE, HttpResponse};

/// All `Set-Cookie` header values of a response
#[must_use]
pub fn set_cookie_headers<B>(response: &HttpResponse<B>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

/// Assert that a response carries no `Set-Cookie` header
///
/// # Panics
///
/// Panics if a `Set-Cookie` header is present.
pub fn assert_no_set_cookie<B>(response: &HttpResponse<B>) {
    let headers = set_cookie_headers(response);
    assert!(headers.is_empty(), "Expected no Set-Cookie, got {headers:?}");
}

/// Assert that a `Set-Cookie` value binds a session-scoped cross-domain cookie
///
/// Returns the session identifier carried by the header.
///
/// # Panics
///
/// Panics if the header is not `JSESSIONID=<id>; Path=/; Secure; SameSite=None`.
#[must_use]
pub fn assert_cross_domain_session_cookie(header: &str) -> String {
    let mut attributes = header.split("; ");
    let pair = attributes.next().unwrap_or_default();
    let (name, value) = pair.split_once('=').unwrap_or_default();
    assert_eq!(name, "JSESSIONID", "Unexpected cookie name in {header}");
    assert!(!value.is_empty(), "Empty session identifier in {header}");
    assert_eq!(
        attributes.collect::<Vec<_>>(),
        vec!["Path=/", "Secure", "SameSite=None"],
        "Unexpected cookie attributes in {header}"
    );
    value.to_string()
}

/// Assert that a `Set-Cookie` value removes the session cookie
///
/// # Panics
///
/// Panics if the header does not clear `JSESSIONID`.
pub fn assert_session_cookie_cleared(header: &str) {
    assert!(
        header.starts_with("JSESSIONID=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT;"),
        "Expected session cookie deletion, got {header}"
    );
}
