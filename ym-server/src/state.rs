//! Application state

use std::time::Duration;

use chrono_tz::Tz;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::SettlementToken;
use crate::config::Config;
use crate::ranking::ResetGuard;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Secret for token-guarded endpoints
    pub settlement_token: SettlementToken,
    /// Once-per-day reset guard
    pub reset_guard: ResetGuard,
    /// Business time zone
    pub tz: Tz,
    /// Mount `/api/v1/test/*`
    pub test_endpoints_enabled: bool,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database ready, migrations applied");

        Ok(Self::with_pool(pool, config))
    }

    /// Build the state around an existing pool
    pub fn with_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            settlement_token: SettlementToken::new(&config.reset_token),
            reset_guard: ResetGuard::new(config.reset_guard_enabled),
            tz: config.timezone,
            test_endpoints_enabled: config.test_endpoints_enabled,
        }
    }
}
