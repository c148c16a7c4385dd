//! Database connection pool management
//!
//! Uses sqlx MySqlPool with explicit connection limits. Callers waiting
//! for a connection queue inside the pool without a cap; the acquire
//! timeout is the only bound on how long they wait.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

use super::schema::UniqueKeys;
use crate::error::StartupError;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time a request waits for a free connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the registrations database
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Uniqueness constraints applied to the `registrations` table
    pub unique_keys: UniqueKeys,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "student_db".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            unique_keys: UniqueKeys::default(),
        }
    }
}

impl DbConfig {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Build the bounded pool without opening any connection yet.
///
/// Pair with [`verify_connectivity`] before serving traffic.
pub fn connect_lazy(config: &DbConfig) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(config.connect_options())
}

/// Acquire one connection and hand it straight back to the pool.
///
/// # Errors
///
/// Returns [`StartupError::Connectivity`] if no connection can be opened
/// within the pool's acquire timeout.
pub async fn verify_connectivity(pool: &MySqlPool) -> Result<(), StartupError> {
    let conn = pool.acquire().await.map_err(StartupError::Connectivity)?;
    drop(conn);
    tracing::info!("Connected to MySQL database");
    Ok(())
}
