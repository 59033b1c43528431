use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{dto::RegisteredUser, repo_types::User};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PendingUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            phone: u.phone,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingUsers {
    pub users: Vec<PendingUser>,
}

#[derive(Debug, Serialize)]
pub struct ApprovedUser {
    pub message: String,
    pub user: RegisteredUser,
}
