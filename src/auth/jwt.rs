use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::{Claims, SessionLength, SessionUser};
use crate::{config::JwtConfig, state::AppState};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub session_ttl: Duration,
    pub remember_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            session_ttl: Duration::from_secs((cfg.session_ttl_minutes.max(0) as u64) * 60),
            remember_ttl: Duration::from_secs((cfg.remember_ttl_minutes.max(0) as u64) * 60),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn ttl(&self, length: SessionLength) -> Duration {
        match length {
            SessionLength::Short => self.session_ttl,
            SessionLength::Long => self.remember_ttl,
        }
    }

    /// Signs a token carrying the user's identity and role.
    pub fn issue(&self, user: &SessionUser, length: SessionLength) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl(length).as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, length = ?length, "jwt signed");
        Ok(token)
    }

    pub fn decode_claims(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Resolves a token to a session. Bad tokens degrade to anonymous.
    pub fn validate(&self, token: &str) -> Option<SessionUser> {
        match self.decode_claims(token) {
            Ok(claims) => {
                debug!(user_id = %claims.sub, role = ?claims.role, "jwt verified");
                Some(SessionUser::from(claims))
            }
            Err(e) => {
                warn!(error = %e, "invalid session token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;
    use uuid::Uuid;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            session_ttl_minutes: 60 * 24,
            remember_ttl_minutes: 60 * 24 * 60,
        })
    }

    fn approved_user() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "ana@example.com".into(),
            role: Role::Approved,
        }
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let user = approved_user();
        let token = keys.issue(&user, SessionLength::Short).expect("sign");
        assert_eq!(keys.validate(&token), Some(user));
    }

    #[test]
    fn lifetime_follows_remember_flag() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let user = approved_user();

        let short = keys.issue(&user, SessionLength::Short).expect("sign short");
        let claims = keys.decode_claims(&short).expect("decode short");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);

        let long = keys.issue(&user, SessionLength::Long).expect("sign long");
        let claims = keys.decode_claims(&long).expect("decode long");
        assert_eq!(claims.exp - claims.iat, 60 * 24 * 60 * 60);
    }

    #[test]
    fn expired_token_is_anonymous() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "old@example.com".into(),
            role: Role::Approved,
            iat: now - 3 * 24 * 60 * 60,
            exp: now - 24 * 60 * 60,
            iss: "iss".into(),
            aud: "aud".into(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("sign");
        assert!(keys.validate(&token).is_none());
    }

    #[test]
    fn tampered_token_is_anonymous() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue(&approved_user(), SessionLength::Short).expect("sign");

        let (unsigned, signature) = token.rsplit_once('.').expect("three segments");
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);
        assert!(keys.validate(&tampered).is_none());

        let forged = make_keys("other-secret", "iss", "aud")
            .issue(&approved_user(), SessionLength::Short)
            .expect("sign");
        assert!(keys.validate(&forged).is_none());
    }

    #[test]
    fn wrong_issuer_or_audience_is_anonymous() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.issue(&approved_user(), SessionLength::Short).expect("sign");
        assert!(bad.validate(&token).is_none());
    }

    #[test]
    fn garbage_is_anonymous() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(keys.validate("not.a.jwt").is_none());
        assert!(keys.validate("").is_none());
    }
}
