use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Appointment slot row.
#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Option<Uuid>,      // NULL = unreserved
    pub appointment_date: OffsetDateTime,
    pub status: AppointmentStatus,
    pub created_at: OffsetDateTime,
}

/// Reserved slot joined with its holder's contact details.
#[derive(Debug, Clone, FromRow)]
pub struct ReservedAppointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub appointment_date: OffsetDateTime,
    pub status: AppointmentStatus,
    pub created_at: OffsetDateTime,
    pub full_name: String,
    pub phone: String,
}

/// Result of trying to claim a slot.
#[derive(Debug)]
pub enum ReserveOutcome {
    Reserved(Appointment),
    NotFound,
    AlreadyReserved,
}
