use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::claims::SessionUser;
use super::cookies::extract_auth_token;
use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Session resolved by the session gate, stashed in request extensions.
#[derive(Debug, Clone)]
pub struct ResolvedSession(pub Option<SessionUser>);

/// The caller's session, if any. Handlers decide what anonymity means.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionUser>);

impl CurrentUser {
    /// 401 for anonymous callers.
    pub fn authenticated(self) -> Result<SessionUser, ApiError> {
        self.0
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".into()))
    }

    /// 403 for anonymous and non-admin callers alike.
    pub fn admin(self) -> Result<SessionUser, ApiError> {
        match self.0 {
            Some(user) if user.is_admin() => Ok(user),
            _ => Err(ApiError::forbidden()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ResolvedSession(session)) = parts.extensions.get::<ResolvedSession>() {
            return Ok(CurrentUser(session.clone()));
        }
        let session = extract_auth_token(&parts.headers)
            .and_then(|token| JwtKeys::from_ref(state).validate(token));
        Ok(CurrentUser(session))
    }
}
