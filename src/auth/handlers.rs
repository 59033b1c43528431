use axum::{
    extract::{FromRef, State},
    http::header::SET_COOKIE,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::{Role, SessionLength, SessionUser},
        cookies::{build_auth_cookie, clear_auth_cookie},
        dto::{
            LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse,
            RegisteredUser,
        },
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_dummy_password, verify_password},
        repo_types::NewUser,
        services::{is_valid_email, normalize_email, validate_registration},
    },
    error::ApiError,
    extract::JsonBody,
    response::{ApiResponse, ApiResult, MessageBody},
    state::AppState,
    store::StoreError,
};

const BAD_CREDENTIALS: &str = "Incorrect email or password.";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    payload.email = normalize_email(&payload.email);
    payload.full_name = payload.full_name.trim().to_string();

    if let Err(field) = validate_registration(&payload) {
        warn!(field, "invalid registration payload");
        return Err(ApiError::invalid_input());
    }

    // Ensure email is not taken
    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("This email is already registered.".into()));
    }

    let password_hash = hash_password(&payload.password).await?;

    let user = match state
        .users
        .create(NewUser {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            password_hash,
            role: Role::PendingApproval,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::UniqueViolation(_)) => {
            return Err(ApiError::Conflict("This email is already registered.".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(ApiResponse::created(RegisterResponse {
        message: "User registered. Wait for an administrator to approve your account.".into(),
        user: RegisteredUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::invalid_input());
    }

    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        verify_dummy_password(&payload.password).await;
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::Conflict(BAD_CREDENTIALS.into()));
    };

    if !verify_password(&payload.password, &user.password_hash).await? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Conflict(BAD_CREDENTIALS.into()));
    }

    let role = user.role();
    if !role.is_approved() {
        warn!(user_id = %user.id, "login while pending approval");
        return Err(ApiError::Forbidden("Your account is pending approval.".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let length = SessionLength::from_remember(payload.remember);
    let token = keys.issue(&user.session(), length)?;
    let cookie = build_auth_cookie(&token, keys.ttl(length), state.config.production);

    info!(user_id = %user.id, email = %user.email, remember = payload.remember, "user logged in");
    Ok((
        [(SET_COOKIE, cookie)],
        ApiResponse::ok(LoginResponse {
            message: "Logged in.".into(),
            user: PublicUser {
                id: user.id,
                email: user.email,
                is_admin: role.is_admin(),
                is_approved: role.is_approved(),
            },
            redirect_to: role.home_path(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_auth_cookie(state.config.production))],
        ApiResponse::ok(MessageBody::new("Logged out.")),
    )
}

#[derive(Debug, serde::Serialize)]
pub struct MeResponse {
    pub user: SessionUser,
}

#[instrument]
pub async fn get_me(current: CurrentUser) -> ApiResult<MeResponse> {
    let user = current.authenticated()?;
    Ok(ApiResponse::ok(MeResponse { user }))
}
