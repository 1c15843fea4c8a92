//! Test utilities and mock implementations for integration tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use hh_core::traits::{CatalogStore, EmployerDirectory};
use hh_core::{AppError, Employer, FetchErrorDetails, Vacancy};

pub fn employer(id: i64, name: &str) -> Employer {
    Employer {
        id,
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        url: format!("https://hh.ru/employer/{}", id),
    }
}

pub fn vacancy(id: i64, employer_id: i64, title: &str, from: Option<i32>, to: Option<i32>) -> Vacancy {
    Vacancy {
        id,
        title: title.to_string(),
        salary_from: from,
        salary_to: to,
        url: format!("https://hh.ru/vacancy/{}", id),
        employer_id,
    }
}

// =============================================================================
// MockDirectory
// =============================================================================

/// In-memory employer directory.
///
/// Employers not registered with [`MockDirectory::with_employer`] yield a
/// 404 `RemoteFetchError`, as the real API does. Vacancy fetches can be made
/// to fail per employer.
#[derive(Clone, Default)]
pub struct MockDirectory {
    employers: HashMap<i64, Employer>,
    vacancies: HashMap<i64, Vec<Vacancy>>,
    failing_vacancies: HashSet<i64>,
    /// Employer ids in the order they were requested.
    pub requests: Arc<Mutex<Vec<i64>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employer(mut self, employer: Employer, vacancies: Vec<Vacancy>) -> Self {
        self.vacancies.insert(employer.id, vacancies);
        self.employers.insert(employer.id, employer);
        self
    }

    /// Makes `fetch_vacancies` fail for `employer_id` with a 503.
    pub fn with_failing_vacancies(mut self, employer_id: i64) -> Self {
        self.failing_vacancies.insert(employer_id);
        self
    }

    pub fn requested(&self) -> Vec<i64> {
        self.requests.lock().unwrap().clone()
    }
}

impl EmployerDirectory for MockDirectory {
    async fn fetch_employer(&self, employer_id: i64) -> Result<Employer, AppError> {
        self.requests.lock().unwrap().push(employer_id);
        self.employers.get(&employer_id).cloned().ok_or_else(|| {
            AppError::RemoteFetchError(FetchErrorDetails::http(404, "Not Found"))
        })
    }

    async fn fetch_vacancies(&self, employer_id: i64) -> Result<Vec<Vacancy>, AppError> {
        if self.failing_vacancies.contains(&employer_id) {
            return Err(AppError::RemoteFetchError(FetchErrorDetails::http(
                503,
                "Service Unavailable",
            )));
        }
        Ok(self.vacancies.get(&employer_id).cloned().unwrap_or_default())
    }
}

// =============================================================================
// MockCatalogStore
// =============================================================================

/// In-memory catalog with upsert semantics and a foreign key check.
#[derive(Clone, Default)]
pub struct MockCatalogStore {
    employers: Arc<Mutex<BTreeMap<i64, Employer>>>,
    vacancies: Arc<Mutex<BTreeMap<i64, Vacancy>>>,
    /// Log of writes as `("employer" | "vacancy", id)`.
    pub writes: Arc<Mutex<Vec<(&'static str, i64)>>>,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employer(&self, id: i64) -> Option<Employer> {
        self.employers.lock().unwrap().get(&id).cloned()
    }

    pub fn vacancy(&self, id: i64) -> Option<Vacancy> {
        self.vacancies.lock().unwrap().get(&id).cloned()
    }

    pub fn employer_count(&self) -> usize {
        self.employers.lock().unwrap().len()
    }

    pub fn vacancy_count(&self) -> usize {
        self.vacancies.lock().unwrap().len()
    }

    pub fn vacancies_of(&self, employer_id: i64) -> usize {
        self.vacancies
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.employer_id == employer_id)
            .count()
    }

    pub fn write_log(&self) -> Vec<(&'static str, i64)> {
        self.writes.lock().unwrap().clone()
    }
}

impl CatalogStore for MockCatalogStore {
    async fn upsert_employer(&self, employer: &Employer) -> Result<(), AppError> {
        self.employers
            .lock()
            .unwrap()
            .insert(employer.id, employer.clone());
        self.writes.lock().unwrap().push(("employer", employer.id));
        Ok(())
    }

    async fn upsert_vacancy(&self, vacancy: &Vacancy) -> Result<(), AppError> {
        if !self
            .employers
            .lock()
            .unwrap()
            .contains_key(&vacancy.employer_id)
        {
            return Err(AppError::IntegrityViolation(format!(
                "vacancy {} references missing company {}",
                vacancy.id, vacancy.employer_id
            )));
        }
        self.vacancies
            .lock()
            .unwrap()
            .insert(vacancy.id, vacancy.clone());
        self.writes.lock().unwrap().push(("vacancy", vacancy.id));
        Ok(())
    }
}
