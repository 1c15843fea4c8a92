//! Write side: idempotent upserts of employers and vacancies.

use hh_core::{AppError, Employer, Vacancy};
use sqlx::PgPool;

const VACANCY_COLUMNS: &str =
    "id, title, salary_from, salary_to, url, company_id AS employer_id";

/// Repository for the `companies` and `vacancies` tables.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use hh_db::CatalogRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(1)
///     .connect("postgresql://postgres@localhost/headhunter_project")
///     .await?;
///
/// let repo = CatalogRepository::new(pool);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the employer or overwrites name, description and url.
    pub async fn upsert_employer(&self, employer: &Employer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO companies (id, name, description, url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                url = EXCLUDED.url
            "#,
        )
        .bind(employer.id)
        .bind(&employer.name)
        .bind(&employer.description)
        .bind(&employer.url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the vacancy or overwrites every other column, owner included.
    ///
    /// # Errors
    ///
    /// `AppError::IntegrityViolation` when `vacancy.employer_id` has no row in
    /// `companies`.
    pub async fn upsert_vacancy(&self, vacancy: &Vacancy) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO vacancies (id, title, salary_from, salary_to, url, company_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                salary_from = EXCLUDED.salary_from,
                salary_to = EXCLUDED.salary_to,
                url = EXCLUDED.url,
                company_id = EXCLUDED.company_id
            "#,
        )
        .bind(vacancy.id)
        .bind(&vacancy.title)
        .bind(vacancy.salary_from)
        .bind(vacancy.salary_to)
        .bind(&vacancy.url)
        .bind(vacancy.employer_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_employer(&self, id: i64) -> Result<Option<Employer>, AppError> {
        let employer = sqlx::query_as::<_, Employer>(
            "SELECT id, name, description, url FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employer)
    }

    pub async fn get_vacancy(&self, id: i64) -> Result<Option<Vacancy>, AppError> {
        let query = format!("SELECT {} FROM vacancies WHERE id = $1", VACANCY_COLUMNS);
        let vacancy = sqlx::query_as::<_, Vacancy>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vacancy)
    }

    /// Vacancies of one employer, by id.
    pub async fn vacancies_for_employer(&self, employer_id: i64) -> Result<Vec<Vacancy>, AppError> {
        let query = format!(
            "SELECT {} FROM vacancies WHERE company_id = $1 ORDER BY id",
            VACANCY_COLUMNS
        );
        let vacancies = sqlx::query_as::<_, Vacancy>(&query)
            .bind(employer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(vacancies)
    }
}

impl hh_core::CatalogStore for CatalogRepository {
    async fn upsert_employer(&self, employer: &Employer) -> Result<(), AppError> {
        CatalogRepository::upsert_employer(self, employer).await
    }

    async fn upsert_vacancy(&self, vacancy: &Vacancy) -> Result<(), AppError> {
        CatalogRepository::upsert_vacancy(self, vacancy).await
    }
}
