use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub session_ttl_minutes: i64,
    pub remember_ttl_minutes: i64,
}

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Marks the auth cookie `Secure`.
    pub production: bool,
    /// Offset used to read slot date/time input and calendar days.
    #[serde(skip, default = "utc")]
    pub reference_offset: UtcOffset,
    pub admin: Option<AdminBootstrap>,
}

fn utc() -> UtcOffset {
    UtcOffset::UTC
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "slotbook".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "slotbook-users".into()),
            session_ttl_minutes: std::env::var("JWT_SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
            remember_ttl_minutes: std::env::var("JWT_REMEMBER_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 60),
        };
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let reference_offset = match std::env::var("APPOINTMENT_UTC_OFFSET") {
            Ok(raw) => parse_offset(&raw)?,
            Err(_) => UtcOffset::UTC,
        };
        let admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            production,
            reference_offset,
            admin,
        })
    }
}

/// Parses offsets written as `+HH:MM` / `-HH:MM`.
pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid APPOINTMENT_UTC_OFFSET {raw:?}, expected e.g. -03:00"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_offsets() {
        let west = parse_offset("-03:00").expect("negative offset");
        assert_eq!(west.whole_hours(), -3);
        let east = parse_offset("+05:30").expect("positive offset");
        assert_eq!(east.whole_minutes(), 5 * 60 + 30);
    }

    #[test]
    fn rejects_unsigned_or_garbage_offsets() {
        assert!(parse_offset("03:00").is_err());
        assert!(parse_offset("utc").is_err());
    }
}
