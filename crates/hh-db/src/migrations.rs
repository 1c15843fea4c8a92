//! Schema for the working database.

use hh_core::AppError;
use sqlx::PgPool;

/// DDL statements, applied in order. Each one is idempotent.
pub const MIGRATIONS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS companies (
        id BIGINT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        url TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS vacancies (
        id BIGINT PRIMARY KEY,
        title TEXT NOT NULL,
        salary_from INTEGER,
        salary_to INTEGER,
        url TEXT NOT NULL,
        company_id BIGINT NOT NULL REFERENCES companies(id)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_vacancies_company_id ON vacancies(company_id)",
];

/// Creates the tables if they are missing. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!(statements = MIGRATIONS.len(), "Schema is up to date");
    Ok(())
}
