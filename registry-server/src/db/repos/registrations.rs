//! Registration repository over MySQL
//!
//! - insert: one parameterized INSERT, duplicates surface as DbError::Duplicate
//! - lookups: read back by student id for verification

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use super::{DbError, RegistrationStore, StoredRegistration};
use crate::models::Registration;

const INSERT_SQL: &str = r#"
    INSERT INTO registrations
        (name, email, age, nationality, student_id, school, degree, year_of_admission, languages)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_BY_STUDENT_ID_SQL: &str = r#"
    SELECT
        id, name, email, CAST(age AS CHAR) AS age, nationality, student_id,
        school, degree, year_of_admission, languages, created_at
    FROM registrations
    WHERE student_id = ?
    ORDER BY id
    LIMIT 1
"#;

/// Registration repository
#[derive(Clone)]
pub struct MySqlRegistrationRepo {
    pool: MySqlPool,
}

impl MySqlRegistrationRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn stored_from_row(row: &MySqlRow) -> Result<StoredRegistration, sqlx::Error> {
    Ok(StoredRegistration {
        id: row.try_get("id")?,
        registration: Registration {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            age: row.try_get("age")?,
            nationality: row.try_get("nationality")?,
            student_id: row.try_get("student_id")?,
            school: row.try_get("school")?,
            degree: row.try_get("degree")?,
            year_of_admission: row.try_get("year_of_admission")?,
            languages: row.try_get("languages")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl RegistrationStore for MySqlRegistrationRepo {
    async fn insert(&self, registration: &Registration) -> Result<u64, DbError> {
        // Bind order must follow models::COLUMNS
        let result = sqlx::query(INSERT_SQL)
            .bind(registration.name.as_str())
            .bind(registration.email.as_str())
            .bind(registration.age.as_deref())
            .bind(registration.nationality.as_deref())
            .bind(registration.student_id.as_str())
            .bind(registration.school.as_deref())
            .bind(registration.degree.as_deref())
            .bind(registration.year_of_admission.as_deref())
            .bind(registration.languages.as_deref())
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id())
    }

    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<StoredRegistration>, DbError> {
        let row = sqlx::query(SELECT_BY_STUDENT_ID_SQL)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(stored_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<u64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
