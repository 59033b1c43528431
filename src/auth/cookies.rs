use std::time::Duration;

use axum::http::{header::COOKIE, HeaderMap};

pub const AUTH_COOKIE_NAME: &str = "auth_token";

pub fn build_auth_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_auth_cookie(secure: bool) -> String {
    build_auth_cookie("", Duration::ZERO, secure)
}

/// Pulls the session token out of any `Cookie` header on the request.
pub fn extract_auth_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
