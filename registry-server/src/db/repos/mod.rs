//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Parameterized statements only, values are never spliced into SQL
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod memory;
pub mod registrations;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Registration;

pub use memory::MemoryRegistrationStore;
pub use registrations::MySqlRegistrationRepo;

/// Registration as stored, with the identifiers storage assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRegistration {
    pub id: u64,
    pub registration: Registration,
    pub created_at: DateTime<Utc>,
}

/// Database error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    /// A uniqueness constraint rejected the row
    #[error("duplicate key: {message}")]
    Duplicate { message: String },

    /// Any other storage failure, carrying the engine's message
    #[error("{message}")]
    Persistence { message: String },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Duplicate {
                message: db.message().to_owned(),
            },
            sqlx::Error::Database(db) => Self::Persistence {
                message: db.message().to_owned(),
            },
            _ => Self::Persistence {
                message: e.to_string(),
            },
        }
    }
}

/// Storage for registrations.
///
/// Handlers only see this trait, so the backing engine is chosen once at
/// startup and injected through `AppState`.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert one registration and return its assigned id.
    async fn insert(&self, registration: &Registration) -> Result<u64, DbError>;

    /// Look a registration up by its student id.
    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<StoredRegistration>, DbError>;

    /// Number of stored registrations.
    async fn count(&self) -> Result<u64, DbError>;

    /// Cheap round trip proving storage answers.
    async fn ping(&self) -> Result<(), DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_persistence_failures() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        match err {
            DbError::Persistence { message } => assert!(message.contains("timed out")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn persistence_display_is_the_raw_message() {
        let err = DbError::Persistence {
            message: "Unknown column 'x'".into(),
        };
        assert_eq!(err.to_string(), "Unknown column 'x'");
    }
}
