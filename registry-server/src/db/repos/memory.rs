//! In-process registration store
//!
//! Enforces the same `UniqueKeys` as the MySQL schema. The uniqueness
//! check and the append happen under one write lock, so concurrent
//! inserts of the same key resolve to exactly one winner.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{DbError, RegistrationStore, StoredRegistration};
use crate::db::schema::UniqueKeys;
use crate::models::Registration;

#[derive(Debug, Default)]
pub struct MemoryRegistrationStore {
    unique_keys: UniqueKeys,
    rows: RwLock<Vec<StoredRegistration>>,
}

impl MemoryRegistrationStore {
    pub fn new(unique_keys: UniqueKeys) -> Self {
        Self {
            unique_keys,
            rows: RwLock::new(Vec::new()),
        }
    }

    /// First constraint `candidate` would violate against `existing`.
    ///
    /// NULLs never collide, matching SQL unique index semantics.
    fn violated<'k>(
        &'k self,
        existing: &Registration,
        candidate: &Registration,
    ) -> Option<&'k [&'static str]> {
        self.unique_keys
            .constraints()
            .iter()
            .find(|columns| {
                columns.iter().all(|c| match (existing.column(c), candidate.column(c)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                })
            })
            .map(Vec::as_slice)
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn insert(&self, registration: &Registration) -> Result<u64, DbError> {
        let mut rows = self.rows.write().await;

        for row in rows.iter() {
            if let Some(columns) = self.violated(&row.registration, registration) {
                let value: Vec<&str> = columns
                    .iter()
                    .filter_map(|c| registration.column(c))
                    .collect();
                return Err(DbError::Duplicate {
                    message: format!(
                        "Duplicate entry '{}' for key '{}'",
                        value.join("-"),
                        UniqueKeys::index_name(columns)
                    ),
                });
            }
        }

        let id = rows.len() as u64 + 1;
        rows.push(StoredRegistration {
            id,
            registration: registration.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<StoredRegistration>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.registration.student_id == student_id)
            .cloned())
    }

    async fn count(&self) -> Result<u64, DbError> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
