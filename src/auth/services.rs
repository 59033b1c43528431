use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::claims::Role;
use super::dto::RegisterRequest;
use super::password::hash_password;
use super::repo::UserStore;
use super::repo_types::NewUser;
use crate::config::AdminBootstrap;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 9 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Checks a registration payload, naming the first field that fails.
pub(crate) fn validate_registration(req: &RegisterRequest) -> Result<(), &'static str> {
    if req.full_name.trim().chars().count() < 3 {
        return Err("fullName");
    }
    if !is_valid_email(&req.email) {
        return Err("email");
    }
    if !is_valid_phone(&req.phone) {
        return Err("phone");
    }
    if req.password.chars().count() < 6 {
        return Err("password");
    }
    if req.password != req.confirm_password {
        return Err("confirmPassword");
    }
    Ok(())
}

/// Makes sure the configured admin account exists. Existing accounts are left untouched.
pub async fn ensure_admin(users: &dyn UserStore, admin: &AdminBootstrap) -> anyhow::Result<()> {
    let email = normalize_email(&admin.email);
    if let Some(existing) = users.find_by_email(&email).await? {
        if existing.role() != Role::Admin {
            warn!(email = %email, "bootstrap admin email belongs to a non-admin user");
        }
        return Ok(());
    }

    let password_hash = hash_password(&admin.password).await?;
    let user = users
        .create(NewUser {
            full_name: "Administrator".into(),
            email,
            phone: "000000000".into(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "admin account created");
    Ok(())
}
