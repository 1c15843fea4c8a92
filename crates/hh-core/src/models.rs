//! Domain models shared by the client, the database layer and the CLI.

use serde::{Deserialize, Serialize};

/// An employer (company) as stored in the `companies` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employer {
    /// Identifier assigned by hh.ru.
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Public page of the employer on hh.ru.
    pub url: String,
}

/// A job vacancy as stored in the `vacancies` table.
///
/// Salary bounds are independent: either, both or neither may be known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vacancy {
    /// Identifier assigned by hh.ru.
    pub id: i64,
    pub title: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub url: String,
    /// Owning employer; must be stored before the vacancy.
    pub employer_id: i64,
}

/// Read model joining a vacancy with its employer's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VacancyView {
    pub company_name: String,
    pub title: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub url: String,
}

/// Number of stored vacancies for one employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyVacancyCount {
    pub company_name: String,
    pub vacancy_count: i64,
}
