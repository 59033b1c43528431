use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::claims::{Role, SessionUser};

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,      // bcrypt hash, never serialized
    pub is_admin: bool,
    pub is_approved: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_flags(self.is_admin, self.is_approved)
    }

    pub fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role(),
        }
    }
}

/// Values for a user insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
}
