use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a user stands: awaiting approval, approved, or administrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PendingApproval,
    Approved,
    Admin,
}

impl Role {
    /// Folds the persisted flags into a role. Admin wins over the approval flag.
    pub fn from_flags(is_admin: bool, is_approved: bool) -> Self {
        match (is_admin, is_approved) {
            (true, _) => Role::Admin,
            (false, true) => Role::Approved,
            (false, false) => Role::PendingApproval,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn is_approved(self) -> bool {
        self != Role::PendingApproval
    }

    /// Landing page after login or when bounced off a public page.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            _ => "/request-appointment",
        }
    }
}

/// How long an issued session stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLength {
    Short,
    /// "Remember me".
    Long,
}

impl SessionLength {
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            SessionLength::Long
        } else {
            SessionLength::Short
        }
    }
}

/// JWT payload carried in the `auth_token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // user ID
    pub email: String,
    pub role: Role,
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}

/// Identity resolved from a valid token for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_approved(&self) -> bool {
        self.role.is_approved()
    }
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}
