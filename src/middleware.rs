//! Session gate: resolves the caller's session once per request and applies
//! the page-level access policy before any handler runs.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::auth::{
    claims::SessionUser, cookies::extract_auth_token, extractors::ResolvedSession, jwt::JwtKeys,
};
use crate::state::AppState;

const PUBLIC_ROUTES: &[&str] = &["/login", "/register"];
const ADMIN_ROUTES: &[&str] = &["/admin"];
const USER_ROUTES: &[&str] = &["/request-appointment"];

pub const LOGIN_PATH: &str = "/login";
pub const PENDING_LOGIN_PATH: &str = "/login?error=pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    Redirect(&'static str),
}

fn matches_prefix(path: &str, routes: &[&str]) -> bool {
    routes.iter().any(|route| path.starts_with(route))
}

/// Route policy. Checks run in order; the first match wins.
pub fn decide(path: &str, user: Option<&SessionUser>) -> Gate {
    if PUBLIC_ROUTES.contains(&path) {
        return match user {
            Some(u) => Gate::Redirect(u.role.home_path()),
            None => Gate::Proceed,
        };
    }

    if path.starts_with("/api/") {
        return Gate::Proceed;
    }

    if path == "/" {
        return match user {
            Some(u) => Gate::Redirect(u.role.home_path()),
            None => Gate::Redirect(LOGIN_PATH),
        };
    }

    if matches_prefix(path, ADMIN_ROUTES) {
        return match user {
            None => Gate::Redirect(LOGIN_PATH),
            Some(u) if !u.is_admin() => Gate::Redirect(u.role.home_path()),
            Some(_) => Gate::Proceed,
        };
    }

    if matches_prefix(path, USER_ROUTES) {
        return match user {
            None => Gate::Redirect(LOGIN_PATH),
            Some(u) if u.is_admin() => Gate::Redirect(u.role.home_path()),
            Some(u) if !u.is_approved() => Gate::Redirect(PENDING_LOGIN_PATH),
            Some(_) => Gate::Proceed,
        };
    }

    match user {
        None => Gate::Redirect(LOGIN_PATH),
        Some(_) => Gate::Proceed,
    }
}

pub async fn session_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let session = extract_auth_token(req.headers())
        .and_then(|token| JwtKeys::from_ref(&state).validate(token));

    let path = req.uri().path().to_string();
    match decide(&path, session.as_ref()) {
        Gate::Proceed => {
            req.extensions_mut().insert(ResolvedSession(session));
            next.run(req).await
        }
        Gate::Redirect(to) => {
            debug!(%path, to, "session gate redirect");
            Redirect::to(to).into_response()
        }
    }
}
