//! Read side: the report queries.
//!
//! A vacancy's salary midpoint is `(COALESCE(salary_from, 0) +
//! COALESCE(salary_to, 0)) / 2`, an integer division that truncates. The
//! average of those midpoints is returned as `float8`. Only vacancies with at
//! least one bound count towards the average. `hh_core::salary` holds the same arithmetic in Rust.

use hh_core::{AppError, CompanyVacancyCount, VacancyView};
use sqlx::PgPool;

/// Escapes `\`, `%` and `_` so `input` matches literally inside a `LIKE`
/// pattern using `ESCAPE '\'`.
///
/// # Examples
///
/// ```
/// use hh_db::escape_like;
///
/// assert_eq!(escape_like("100%"), "100\\%");
/// assert_eq!(escape_like("c_sharp"), "c\\_sharp");
/// ```
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for the aggregate reports. Every call queries current data.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Employers with their vacancy counts, zero included. Most vacancies
    /// first; ties by name, then id.
    pub async fn companies_with_vacancy_counts(&self) -> Result<Vec<CompanyVacancyCount>, AppError> {
        let rows = sqlx::query_as::<_, CompanyVacancyCount>(
            r#"
            SELECT c.name AS company_name, COUNT(v.id) AS vacancy_count
            FROM companies c
            LEFT JOIN vacancies v ON v.company_id = c.id
            GROUP BY c.id, c.name
            ORDER BY vacancy_count DESC, c.name ASC, c.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Average salary midpoint, or `0.0` when no vacancy has a salary bound.
    pub async fn average_salary(&self) -> Result<f64, AppError> {
        let avg: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(
                AVG((COALESCE(salary_from, 0)::int8 + COALESCE(salary_to, 0)::int8) / 2),
                0
            )::float8
            FROM vacancies
            WHERE salary_from IS NOT NULL OR salary_to IS NOT NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(avg)
    }

    /// Vacancies paying strictly more than the current average midpoint,
    /// highest midpoint first.
    ///
    /// The average is recomputed in the same statement.
    pub async fn vacancies_above_average_salary(&self) -> Result<Vec<VacancyView>, AppError> {
        let rows = sqlx::query_as::<_, VacancyView>(
            r#"
            WITH scored AS (
                SELECT v.*,
                       (COALESCE(v.salary_from, 0)::int8 + COALESCE(v.salary_to, 0)::int8) / 2
                           AS midpoint
                FROM vacancies v
            ),
            average AS (
                SELECT COALESCE(AVG(midpoint), 0) AS value
                FROM scored
                WHERE salary_from IS NOT NULL OR salary_to IS NOT NULL
            )
            SELECT c.name AS company_name, s.title, s.salary_from, s.salary_to, s.url
            FROM scored s
            JOIN companies c ON c.id = s.company_id
            CROSS JOIN average a
            WHERE s.midpoint > a.value
            ORDER BY s.midpoint DESC, c.name ASC, s.title ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Vacancies whose title contains `keyword`, ignoring case. `%`, `_` and
    /// `\` in the keyword match themselves.
    pub async fn vacancies_matching_keyword(&self, keyword: &str) -> Result<Vec<VacancyView>, AppError> {
        let rows = sqlx::query_as::<_, VacancyView>(
            r#"
            SELECT c.name AS company_name, v.title, v.salary_from, v.salary_to, v.url
            FROM vacancies v
            JOIN companies c ON c.id = v.company_id
            WHERE v.title ILIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY c.name ASC, v.title ASC, v.id ASC
            "#,
        )
        .bind(escape_like(keyword))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Every vacancy with its employer name, by employer name then title.
    pub async fn all_vacancies(&self) -> Result<Vec<VacancyView>, AppError> {
        let rows = sqlx::query_as::<_, VacancyView>(
            r#"
            SELECT c.name AS company_name, v.title, v.salary_from, v.salary_to, v.url
            FROM vacancies v
            JOIN companies c ON c.id = v.company_id
            ORDER BY c.name ASC, v.title ASC, v.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

impl hh_core::ReportStore for ReportRepository {
    async fn companies_with_vacancy_counts(&self) -> Result<Vec<CompanyVacancyCount>, AppError> {
        ReportRepository::companies_with_vacancy_counts(self).await
    }

    async fn average_salary(&self) -> Result<f64, AppError> {
        ReportRepository::average_salary(self).await
    }

    async fn vacancies_above_average_salary(&self) -> Result<Vec<VacancyView>, AppError> {
        ReportRepository::vacancies_above_average_salary(self).await
    }

    async fn vacancies_matching_keyword(&self, keyword: &str) -> Result<Vec<VacancyView>, AppError> {
        ReportRepository::vacancies_matching_keyword(self, keyword).await
    }

    async fn all_vacancies(&self) -> Result<Vec<VacancyView>, AppError> {
        ReportRepository::all_vacancies(self).await
    }
}
