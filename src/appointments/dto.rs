use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Appointment, AppointmentStatus, ReservedAppointment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Available,
    Reserved,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ListQuery {
    /// `None` when the `type` parameter names no known listing.
    pub fn kind(&self) -> Option<ListKind> {
        match self.kind.as_deref() {
            None => Some(ListKind::default()),
            Some("available") => Some(ListKind::Available),
            Some("reserved") => Some(ListKind::Reserved),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub appointment_date: OffsetDateTime,
    pub status: AppointmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Appointment> for AppointmentView {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            appointment_date: a.appointment_date,
            status: a.status,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedAppointmentView {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub appointment_date: OffsetDateTime,
    pub status: AppointmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub full_name: String,
    pub phone: String,
}

impl From<ReservedAppointment> for ReservedAppointmentView {
    fn from(r: ReservedAppointment) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            appointment_date: r.appointment_date,
            status: r.status,
            created_at: r.created_at,
            full_name: r.full_name,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentList {
    pub appointments: Vec<AppointmentView>,
}

#[derive(Debug, Serialize)]
pub struct ReservedList {
    pub appointments: Vec<ReservedAppointmentView>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentMessage {
    pub message: String,
    pub appointment: AppointmentView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn unknown_type_is_rejected() {
        let q = |kind: Option<&str>| ListQuery { kind: kind.map(str::to_string) };
        assert_eq!(q(None).kind(), Some(ListKind::Available));
        assert_eq!(q(Some("available")).kind(), Some(ListKind::Available));
        assert_eq!(q(Some("reserved")).kind(), Some(ListKind::Reserved));
        assert_eq!(q(Some("everything")).kind(), None);
    }

    #[test]
    fn view_serializes_camel_case_rfc3339() {
        let view = AppointmentView {
            id: Uuid::nil(),
            user_id: None,
            appointment_date: datetime!(2026-11-02 12:30 UTC),
            status: AppointmentStatus::Confirmed,
            created_at: datetime!(2026-10-19 08:00 UTC),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["appointmentDate"], "2026-11-02T12:30:00Z");
        assert_eq!(json["status"], "confirmed");
        assert!(json["userId"].is_null());
    }
}
