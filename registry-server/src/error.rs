//! Error types for registry-server startup
//!
//! Request-time failures live in `http::error::ApiError` and
//! `db::DbError`; this module covers everything that stops the
//! process from serving.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StartupError>;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("schema bootstrap failed: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
