use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    extract::{parse_id, JsonBody, QueryParams},
    response::{ApiResponse, ApiResult},
    state::AppState,
    store::StoreError,
};

use super::dto::{
    AppointmentList, AppointmentMessage, AppointmentView, CreateAppointmentRequest, ListKind,
    ListQuery, ReservedList,
};
use super::repo_types::ReserveOutcome;
use super::services::{check_slot, parse_slot, start_of_tomorrow, SlotRejection};

const ALREADY_HAS_RESERVATION: &str = "You already have an appointment reserved.";

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/:id",
            patch(reserve_appointment).delete(delete_appointment),
        )
}

/// Either listing shape; both serialize as `{appointments: [...]}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Available(AppointmentList),
    Reserved(ReservedList),
}

#[instrument(skip(state, query))]
pub async fn list_appointments(
    State(state): State<AppState>,
    current: CurrentUser,
    query: Result<QueryParams<ListQuery>, ApiError>,
) -> ApiResult<Listing> {
    let user = current.authenticated()?;
    let QueryParams(query) = query?;
    let Some(kind) = query.kind() else {
        warn!(kind = ?query.kind, "unknown listing type");
        return Err(ApiError::bad_request("Invalid listing type."));
    };

    let now = OffsetDateTime::now_utc();
    match kind {
        ListKind::Available => {
            let after = start_of_tomorrow(now, state.config.reference_offset);
            let rows = state.appointments.list_after(after).await?;
            Ok(ApiResponse::ok(Listing::Available(AppointmentList {
                appointments: rows.into_iter().map(Into::into).collect(),
            })))
        }
        ListKind::Reserved => {
            if !user.is_admin() {
                return Err(ApiError::forbidden());
            }
            let rows = state.appointments.list_reserved_from(now).await?;
            Ok(ApiResponse::ok(Listing::Reserved(ReservedList {
                appointments: rows.into_iter().map(Into::into).collect(),
            })))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_appointment(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<JsonBody<CreateAppointmentRequest>, ApiError>,
) -> ApiResult<AppointmentMessage> {
    let admin = current.admin()?;
    let JsonBody(payload) = payload?;

    let offset = state.config.reference_offset;
    let at = match (payload.date.as_deref(), payload.time.as_deref()) {
        (Some(date), Some(time)) => parse_slot(date, time, offset),
        _ => Err(SlotRejection::Malformed),
    }
    .and_then(|at| check_slot(at, OffsetDateTime::now_utc(), offset).map(|_| at))
    .map_err(|rejection| {
        warn!(?rejection, "slot rejected");
        ApiError::bad_request(rejection.to_string())
    })?;

    if state.appointments.find_at(at).await?.is_some() {
        warn!(%at, "slot already exists");
        return Err(duplicate_slot());
    }

    let appointment = match state.appointments.create(at).await {
        Ok(a) => a,
        Err(StoreError::UniqueViolation(_)) => return Err(duplicate_slot()),
        Err(e) => return Err(e.into()),
    };

    info!(appointment_id = %appointment.id, admin_id = %admin.id, %at, "slot created");
    Ok(ApiResponse::created(AppointmentMessage {
        message: "Appointment created.".into(),
        appointment: AppointmentView::from(appointment),
    }))
}

fn not_authenticated() -> ApiError {
    ApiError::Forbidden("You are not authenticated.".into())
}

fn duplicate_slot() -> ApiError {
    ApiError::bad_request("An appointment already exists at that date and time.")
}

#[instrument(skip(state))]
pub async fn reserve_appointment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<AppointmentMessage> {
    let Some(user) = current.0 else {
        return Err(not_authenticated());
    };
    let id = parse_id(&id)?;

    // Tokens outlive rejected accounts.
    if state.users.find_by_id(user.id).await?.is_none() {
        warn!(user_id = %user.id, "reservation from deleted account");
        return Err(not_authenticated());
    }

    if state.appointments.find_active_by_user(user.id).await?.is_some() {
        warn!(user_id = %user.id, "user already holds a reservation");
        return Err(ApiError::bad_request(ALREADY_HAS_RESERVATION));
    }

    let appointment = match state.appointments.reserve(id, user.id).await {
        Ok(ReserveOutcome::Reserved(a)) => a,
        Ok(ReserveOutcome::NotFound) => return Err(ApiError::not_found("Appointment not found.")),
        Ok(ReserveOutcome::AlreadyReserved) => {
            warn!(appointment_id = %id, user_id = %user.id, "slot already reserved");
            return Err(ApiError::bad_request("The appointment is already reserved."));
        }
        Err(StoreError::UniqueViolation(_)) => {
            return Err(ApiError::bad_request(ALREADY_HAS_RESERVATION));
        }
        Err(StoreError::ForeignKeyViolation(_)) => return Err(not_authenticated()),
        Err(e) => return Err(e.into()),
    };

    info!(appointment_id = %appointment.id, user_id = %user.id, "slot reserved");
    Ok(ApiResponse::ok(AppointmentMessage {
        message: "Appointment reserved.".into(),
        appointment: AppointmentView::from(appointment),
    }))
}

#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<AppointmentMessage> {
    let admin = current.admin()?;
    let id = parse_id(&id)?;

    let Some(appointment) = state.appointments.delete(id).await? else {
        return Err(ApiError::not_found("Appointment not found."));
    };

    info!(appointment_id = %appointment.id, admin_id = %admin.id, "slot deleted");
    Ok(ApiResponse::ok(AppointmentMessage {
        message: "Appointment deleted.".into(),
        appointment: AppointmentView::from(appointment),
    }))
}
