//! Trait definitions for external dependencies.
//!
//! The pipeline and the report printer are written against these traits, not
//! against `reqwest` or `sqlx` directly:
//!
//! - [`EmployerDirectory`] - the remote employer/vacancy API (`hh_client::HhClient`)
//! - [`CatalogStore`] - idempotent writes (`hh_db::CatalogRepository`)
//! - [`ReportStore`] - read-only aggregate queries (`hh_db::ReportRepository`)
//!
//! Tests substitute in-memory implementations.

use std::future::Future;

use crate::{AppError, CompanyVacancyCount, Employer, Vacancy, VacancyView};

/// Source of employer and vacancy records.
pub trait EmployerDirectory: Send + Sync + Clone {
    /// Fetches a single employer by id.
    fn fetch_employer(
        &self,
        employer_id: i64,
    ) -> impl Future<Output = Result<Employer, AppError>> + Send;

    /// Fetches every open vacancy of an employer, across all result pages.
    ///
    /// Either all pages are returned, in page order, or an error; never a
    /// partial list.
    fn fetch_vacancies(
        &self,
        employer_id: i64,
    ) -> impl Future<Output = Result<Vec<Vacancy>, AppError>> + Send;
}

/// Idempotent persistence of employers and vacancies.
pub trait CatalogStore: Send + Sync + Clone {
    /// Inserts the employer or overwrites every non-key field of the stored row.
    fn upsert_employer(
        &self,
        employer: &Employer,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Inserts the vacancy or overwrites every non-key field of the stored row,
    /// including the owning employer.
    ///
    /// # Errors
    ///
    /// [`AppError::IntegrityViolation`] if `vacancy.employer_id` is not stored.
    fn upsert_vacancy(&self, vacancy: &Vacancy)
    -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Read-only reporting queries. Every call reflects the data at call time.
pub trait ReportStore: Send + Sync {
    /// One row per employer, zero counts included, most vacancies first.
    /// Equal counts are ordered by employer name.
    fn companies_with_vacancy_counts(
        &self,
    ) -> impl Future<Output = Result<Vec<CompanyVacancyCount>, AppError>> + Send;

    /// Average salary midpoint over vacancies with at least one bound, or 0.
    fn average_salary(&self) -> impl Future<Output = Result<f64, AppError>> + Send;

    /// Vacancies whose midpoint is strictly above [`average_salary`](Self::average_salary),
    /// highest first.
    fn vacancies_above_average_salary(
        &self,
    ) -> impl Future<Output = Result<Vec<VacancyView>, AppError>> + Send;

    /// Vacancies whose title contains `keyword`, ignoring case, ordered by
    /// employer name then title.
    fn vacancies_matching_keyword(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<VacancyView>, AppError>> + Send;

    /// Every vacancy with its employer name, ordered by employer name then title.
    fn all_vacancies(&self) -> impl Future<Output = Result<Vec<VacancyView>, AppError>> + Send;
}
