use anyhow::Context;
use lazy_static::lazy_static;
use tracing::error;

/// bcrypt work factor for stored password hashes.
pub const BCRYPT_COST: u32 = 10;

lazy_static! {
    /// Verified against when the account is unknown, so both login failures cost the same.
    static ref DUMMY_HASH: Option<String> =
        bcrypt::hash("slotbook-unknown-account", BCRYPT_COST).ok();
}

pub async fn hash_password(plain: &str) -> anyhow::Result<String> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, BCRYPT_COST))
        .await
        .context("hash task panicked")?
        .map_err(|e| {
            error!(error = %e, "bcrypt hash error");
            anyhow::anyhow!(e)
        })
}

pub async fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let plain = plain.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
        .await
        .context("verify task panicked")?
        .map_err(|e| {
            error!(error = %e, "bcrypt verify error");
            anyhow::anyhow!(e)
        })
}

/// Spends one bcrypt verify without an account to check against.
pub async fn verify_dummy_password(plain: &str) {
    let plain = plain.to_string();
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = bcrypt::verify(plain, hash);
        }
    })
    .await;
}

/// Computes the dummy hash up front instead of on the first unknown login.
pub async fn prime_dummy_hash() {
    let _ = tokio::task::spawn_blocking(|| lazy_static::initialize(&DUMMY_HASH)).await;
}
