use std::sync::Arc;

use tracing::warn;

use crate::appointments::repo::{AppointmentStore, PgAppointmentStore};
use crate::auth::{
    password::prime_dummy_hash,
    repo::{PgUserStore, UserStore},
    services::ensure_admin,
};
use crate::config::AppConfig;
use crate::store;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub appointments: Arc<dyn AppointmentStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = store::connect(&config.database_url).await?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            warn!(error = %e, "migration failed; continuing");
        }

        let state = Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>,
            Arc::new(PgAppointmentStore::new(db)) as Arc<dyn AppointmentStore>,
        );

        if let Some(admin) = &state.config.admin {
            ensure_admin(state.users.as_ref(), admin).await?;
        }

        prime_dummy_hash().await;

        Ok(state)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self {
            config,
            users,
            appointments,
        }
    }
}
