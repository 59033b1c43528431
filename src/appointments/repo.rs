use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Appointment, ReserveOutcome, ReservedAppointment};
use crate::store::StoreResult;

/// Persistence for appointment slots.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Slots strictly after `after`, earliest first.
    async fn list_after(&self, after: OffsetDateTime) -> StoreResult<Vec<Appointment>>;
    /// Reserved slots at or after `from`, earliest first.
    async fn list_reserved_from(
        &self,
        from: OffsetDateTime,
    ) -> StoreResult<Vec<ReservedAppointment>>;
    async fn find_at(&self, at: OffsetDateTime) -> StoreResult<Option<Appointment>>;
    /// Fails with `UniqueViolation` when a slot already exists at `at`.
    async fn create(&self, at: OffsetDateTime) -> StoreResult<Appointment>;
    /// The caller's active (non-cancelled) reservation, if any.
    async fn find_active_by_user(&self, user_id: Uuid) -> StoreResult<Option<Appointment>>;
    /// Claims an unreserved slot. Fails with `UniqueViolation` when the user
    /// already holds an active reservation and `ForeignKeyViolation` when the
    /// user no longer exists.
    async fn reserve(&self, id: Uuid, user_id: Uuid) -> StoreResult<ReserveOutcome>;
    async fn delete(&self, id: Uuid) -> StoreResult<Option<Appointment>>;
}

#[derive(Clone)]
pub struct PgAppointmentStore {
    db: PgPool,
}

impl PgAppointmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const APPOINTMENT_COLUMNS: &str = "id, user_id, appointment_date, status, created_at";

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn list_after(&self, after: OffsetDateTime) -> StoreResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointments
            WHERE appointment_date > $1
            ORDER BY appointment_date ASC
            "#
        ))
        .bind(after)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_reserved_from(
        &self,
        from: OffsetDateTime,
    ) -> StoreResult<Vec<ReservedAppointment>> {
        let rows = sqlx::query_as::<_, ReservedAppointment>(
            r#"
            SELECT a.id, a.user_id, a.appointment_date, a.status, a.created_at,
                   u.full_name, u.phone
              FROM appointments a
              JOIN users u ON u.id = a.user_id
             WHERE a.appointment_date >= $1
             ORDER BY a.appointment_date ASC
            "#,
        )
        .bind(from)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_at(&self, at: OffsetDateTime) -> StoreResult<Option<Appointment>> {
        let row = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appointment_date = $1"
        ))
        .bind(at)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, at: OffsetDateTime) -> StoreResult<Appointment> {
        let row = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments (appointment_date)
            VALUES ($1)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(at)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> StoreResult<Option<Appointment>> {
        let row = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointments
            WHERE user_id = $1 AND status <> 'cancelled'
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn reserve(&self, id: Uuid, user_id: Uuid) -> StoreResult<ReserveOutcome> {
        // Conditional update: of two racing callers only one sees the NULL.
        let claimed = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments
               SET user_id = $2, status = 'confirmed'
             WHERE id = $1 AND user_id IS NULL
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        if let Some(appointment) = claimed {
            return Ok(ReserveOutcome::Reserved(appointment));
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM appointments WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;
        Ok(if exists {
            ReserveOutcome::AlreadyReserved
        } else {
            ReserveOutcome::NotFound
        })
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        let row = sqlx::query_as::<_, Appointment>(&format!(
            "DELETE FROM appointments WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
