use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

/// `Json<T>` whose rejection is the uniform 400 envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "rejected request body");
                Err(ApiError::invalid_input())
            }
        }
    }
}

/// `Query<T>` with the same 400 envelope as [`JsonBody`].
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "rejected query string");
                Err(ApiError::invalid_input())
            }
        }
    }
}

/// Parses an id path segment.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::bad_request("id is required"));
    }
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("invalid id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_cases() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id(" "), Err(ApiError::BadRequest(m)) if m == "id is required"));
        assert!(matches!(parse_id("42"), Err(ApiError::BadRequest(m)) if m == "invalid id"));
    }
}
