use std::collections::HashMap;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::models::{InterestAssignment, Student, INTEREST_VOCABULARY};

/// Errors that can occur when interacting with the interest store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown interest: {0}")]
    UnknownInterest(String),
}

/// PostgreSQL-backed student-interest store.
///
/// Owns the connection pool and is passed explicitly through application
/// state; every query runs against the pool with parameterized bindings, and
/// the write paths (registration, interest replacement) each run inside a
/// single transaction.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Seed the fixed interest vocabulary.
    ///
    /// Idempotent: already-seeded interests are left untouched.
    pub async fn seed_vocabulary(&self) -> Result<(), StoreError> {
        for interest in INTEREST_VOCABULARY {
            sqlx::query("INSERT INTO interests (interest) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(interest)
                .execute(&self.pool)
                .await?;
        }

        tracing::debug!("Seeded {} vocabulary interests", INTEREST_VOCABULARY.len());

        Ok(())
    }

    /// Fetch the full (student_id, interest) relation.
    ///
    /// This is the matcher's input snapshot; it is re-read on every matching
    /// request so interest updates take effect immediately.
    pub async fn get_assignments(&self) -> Result<Vec<InterestAssignment>, StoreError> {
        let query = r#"
            SELECT si.student_id, i.interest
            FROM student_interests si
            JOIN interests i ON si.interest_id = i.id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let assignments = rows
            .iter()
            .map(|row| InterestAssignment {
                student_id: row.get("student_id"),
                interest: row.get("interest"),
            })
            .collect();

        Ok(assignments)
    }

    /// Look up a student by id
    pub async fn get_student(&self, student_id: i64) -> Result<Student, StoreError> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM students WHERE id = $1")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("student {student_id}")))?;

        Ok(Student {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        })
    }

    /// Look up a student by email
    pub async fn get_student_by_email(&self, email: &str) -> Result<Student, StoreError> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM students WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("student with email {email}")))?;

        Ok(Student {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        })
    }

    /// Register a student with their initial interests.
    ///
    /// Insert and assignments run in one transaction; a failure on any
    /// interest rolls the registration back.
    pub async fn register_student(
        &self,
        name: &str,
        email: &str,
        interests: &[String],
    ) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("INSERT INTO students (name, email) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(email)
            .fetch_one(&mut *tx)
            .await?;
        let student_id: i64 = row.get("id");

        for interest in interests {
            let interest_id = Self::interest_id(&mut tx, interest).await?;
            sqlx::query(
                "INSERT INTO student_interests (student_id, interest_id) VALUES ($1, $2)",
            )
            .bind(student_id)
            .bind(interest_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Registered student {} with {} interests", student_id, interests.len());

        Ok(student_id)
    }

    /// Replace a student's saved interests (delete-then-insert, one
    /// transaction)
    pub async fn replace_interests(
        &self,
        student_id: i64,
        interests: &[String],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM student_interests WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        for interest in interests {
            let interest_id = Self::interest_id(&mut tx, interest).await?;
            sqlx::query(
                "INSERT INTO student_interests (student_id, interest_id) VALUES ($1, $2)",
            )
            .bind(student_id)
            .bind(interest_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!("Replaced interests for student {}: {} saved", student_id, interests.len());

        Ok(())
    }

    /// Get a student's saved interests
    pub async fn get_interests(&self, student_id: i64) -> Result<Vec<String>, StoreError> {
        let query = r#"
            SELECT i.interest
            FROM student_interests si
            JOIN interests i ON si.interest_id = i.id
            WHERE si.student_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("interest")).collect())
    }

    /// Map student ids to display names (for rendering match results)
    pub async fn get_student_names(
        &self,
        student_ids: &[i64],
    ) -> Result<HashMap<i64, String>, StoreError> {
        if student_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query("SELECT id, name FROM students WHERE id = ANY($1)")
            .bind(student_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("id"), row.get("name")))
            .collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    async fn interest_id(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        interest: &str,
    ) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT id FROM interests WHERE interest = $1")
            .bind(interest)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| StoreError::UnknownInterest(interest.to_string()))?;

        Ok(row.get("id"))
    }
}
