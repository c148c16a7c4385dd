//! Schema bootstrap for the `registrations` table
//!
//! Which column sets must be unique is configuration (`UniqueKeys`),
//! not something baked into the DDL.

use std::fmt;
use std::str::FromStr;

use sqlx::MySqlPool;

use crate::error::StartupError;
use crate::models::COLUMNS;

/// Uniqueness constraints on the registrations table.
///
/// Textual form: constraints separated by `,`, columns of one composite
/// constraint joined by `+`. `student_id,email` means two single-column
/// constraints; `student_id+email` means one constraint over the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKeys(Vec<Vec<&'static str>>);

impl UniqueKeys {
    pub fn new(keys: Vec<Vec<&'static str>>) -> Self {
        Self(keys)
    }

    pub fn constraints(&self) -> &[Vec<&'static str>] {
        &self.0
    }

    /// Index name MySQL reports back in duplicate-entry errors.
    pub fn index_name(columns: &[&str]) -> String {
        format!("uq_registrations_{}", columns.join("_"))
    }
}

impl Default for UniqueKeys {
    fn default() -> Self {
        Self(vec![vec!["student_id"], vec!["email"]])
    }
}

/// Error parsing a `UniqueKeys` definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniqueKeysError {
    #[error("unknown registration column '{0}'")]
    UnknownColumn(String),

    #[error("empty constraint in unique key list")]
    EmptyConstraint,
}

impl FromStr for UniqueKeys {
    type Err = UniqueKeysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        for constraint in s.split(',') {
            let mut columns = Vec::new();
            for column in constraint.split('+').map(str::trim) {
                if column.is_empty() {
                    return Err(UniqueKeysError::EmptyConstraint);
                }
                // Only whitelisted names ever reach the DDL below
                let known = COLUMNS
                    .iter()
                    .find(|c| **c == column)
                    .ok_or_else(|| UniqueKeysError::UnknownColumn(column.to_string()))?;
                if !columns.contains(known) {
                    columns.push(*known);
                }
            }
            keys.push(columns);
        }
        Ok(Self(keys))
    }
}

impl fmt::Display for UniqueKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|cols| cols.join("+")).collect();
        f.write_str(&rendered.join(","))
    }
}

/// DDL for the registrations table with the given constraints.
pub fn create_table_sql(keys: &UniqueKeys) -> String {
    let mut sql = String::from(
        r#"CREATE TABLE IF NOT EXISTS registrations (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    age INT NULL,
    nationality VARCHAR(100) NULL,
    student_id VARCHAR(64) NOT NULL,
    school VARCHAR(255) NULL,
    degree VARCHAR(255) NULL,
    year_of_admission VARCHAR(16) NULL,
    languages VARCHAR(512) NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP"#,
    );

    for columns in keys.constraints() {
        sql.push_str(&format!(
            ",\n    UNIQUE KEY {} ({})",
            UniqueKeys::index_name(columns),
            columns.join(", ")
        ));
    }
    sql.push_str("\n)");
    sql
}

/// Create the registrations table if it does not exist yet.
///
/// Constraints on an existing table are left untouched.
pub async fn ensure_schema(pool: &MySqlPool, keys: &UniqueKeys) -> Result<(), StartupError> {
    tracing::info!(unique_keys = %keys, "Ensuring registrations table exists");

    let sql = create_table_sql(keys);
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(StartupError::Schema)?;

    Ok(())
}
