use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{dto::RegisteredUser, extractors::CurrentUser},
    error::ApiError,
    extract::parse_id,
    response::{ApiResponse, ApiResult, MessageBody},
    state::AppState,
};

use super::dto::{ApprovedUser, PendingUsers};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/pending", get(list_pending))
        .route("/users/:id/approve", post(approve_user))
        .route("/users/:id/reject", post(reject_user))
}

#[instrument(skip(state))]
pub async fn list_pending(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<PendingUsers> {
    current.admin()?;
    let users = state.users.list_pending().await?;
    Ok(ApiResponse::ok(PendingUsers {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn approve_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApprovedUser> {
    let admin = current.admin()?;
    let id = parse_id(&id)?;

    let Some(user) = state.users.approve(id).await? else {
        return Err(ApiError::not_found("User not found."));
    };

    info!(user_id = %user.id, admin_id = %admin.id, "user approved");
    Ok(ApiResponse::ok(ApprovedUser {
        message: format!("User {} approved.", user.full_name),
        user: RegisteredUser::from(&user),
    }))
}

#[instrument(skip(state))]
pub async fn reject_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<MessageBody> {
    let admin = current.admin()?;
    let id = parse_id(&id)?;

    let Some(user) = state.users.delete(id).await? else {
        return Err(ApiError::not_found("User not found."));
    };

    info!(user_id = %user.id, admin_id = %admin.id, "user rejected and deleted");
    Ok(ApiResponse::ok(MessageBody::new(format!(
        "User {} rejected and deleted.",
        user.full_name
    ))))
}
