//! registry-server: student registrations over HTTP
//!
//! Accepts `POST /register` submissions, validates the required fields,
//! and stores them in a MySQL `registrations` table. Static landing
//! assets are served from a public directory.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod tracing_setup;

use std::sync::Arc;

pub use config::Config;
pub use error::{Result, StartupError};
pub use http::AppState;

use db::{connect_lazy, ensure_schema, verify_connectivity, MySqlRegistrationRepo};

/// Connect, verify, bootstrap the schema, then serve until shutdown.
///
/// The listener is only bound after the database answered, so a broken
/// database never receives traffic.
pub async fn serve(config: Config) -> Result<()> {
    let db_config = config.db_config();
    tracing::info!(
        host = %db_config.host,
        database = %db_config.database,
        max_connections = db_config.max_connections,
        "Connecting to MySQL"
    );

    let pool = connect_lazy(&db_config);
    verify_connectivity(&pool).await?;

    if config.skip_schema {
        tracing::info!("Skipping schema bootstrap");
    } else {
        ensure_schema(&pool, &db_config.unique_keys).await?;
    }

    let state = AppState::new(Arc::new(MySqlRegistrationRepo::new(pool)));
    http::run_server(state, config.server_config()).await
}
