//! Persistent student store implementation using PostgreSQL.

use crate::domain::student::{Student, StudentId, StudentRecord};
use crate::storage::student::store::{ListQuery, StoreError, StudentPage, StudentStore};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const SELECT_COLUMNS: &str = "id, name, email, age, grade, enrollment_date, is_active";

/// A student store backed by a PostgreSQL connection pool.
///
/// The `UNIQUE` constraint on `students.email` is the hard uniqueness guarantee; the
/// validator's lookup only gives early, per-field feedback.
#[derive(Clone)]
pub struct PostgresStudentStore {
    pool: PgPool,
}

impl PostgresStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `students` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS students (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                age INTEGER NOT NULL,
                grade NUMERIC(4, 2) NOT NULL,
                enrollment_date DATE NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS students_enrollment_date_idx
             ON students (enrollment_date DESC, id)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_student(row: &PgRow) -> Result<Student, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    Ok(Student::new(
        StudentId(id),
        StudentRecord {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            age: row.try_get("age")?,
            grade: row.try_get("grade")?,
            enrollment_date: row.try_get("enrollment_date")?,
            is_active: row.try_get("is_active")?,
        },
    ))
}

/// Maps a unique violation on write to `DuplicateEmail` (email is the only unique column).
fn write_error(e: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::from(e)
}

/// Escapes `%`, `_` and `\` so the term matches literally inside `ILIKE`.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    qb.push(" WHERE TRUE");
    if let Some(active) = query.is_active {
        qb.push(" AND is_active = ").push_bind(active);
    }
    if let Some(term) = query.search_term() {
        let pattern = like_pattern(term);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn exists_with_email(
        &self,
        email: &str,
        excluding: Option<StudentId>,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM students
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )",
        )
        .bind(email)
        .bind(excluding.map(StudentId::get))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, record: &StudentRecord) -> Result<Student, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO students (name, email, age, grade, enrollment_date, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(record.age)
        .bind(record.grade)
        .bind(record.enrollment_date)
        .bind(record.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &record.email))?;
        Ok(Student::new(StudentId(id), record.clone()))
    }

    async fn update(&self, id: StudentId, record: &StudentRecord) -> Result<Student, StoreError> {
        let result = sqlx::query(
            "UPDATE students
             SET name = $1, email = $2, age = $3, grade = $4, enrollment_date = $5, is_active = $6
             WHERE id = $7",
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(record.age)
        .bind(record.grade)
        .bind(record.enrollment_date)
        .bind(record.is_active)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &record.email))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(Student::new(id, record.clone()))
    }

    async fn get(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_student).transpose()?)
    }

    async fn list(&self, query: &ListQuery) -> Result<StudentPage, StoreError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM students", SELECT_COLUMNS));
        push_filters(&mut qb, query);
        qb.push(" ORDER BY enrollment_date DESC, id ASC LIMIT ")
            .push_bind(i64::from(query.per_page))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));
        let rows = qb.build().fetch_all(&self.pool).await?;

        let items = rows
            .iter()
            .map(row_to_student)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StudentPage::new(items, query, u64::try_from(total).unwrap_or(0)))
    }

    async fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
