//! Outcome types for an ingestion run.

/// What to do when one employer fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing employer; the rest are recorded as skipped.
    #[default]
    AbortOnError,
    /// Record the failure and carry on with the next employer.
    ContinueOnError,
}

/// Result of ingesting a single employer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerIngestResult {
    pub employer_id: i64,
    /// Known once the employer record has been fetched.
    pub employer_name: Option<String>,
    /// Vacancies written for this employer.
    pub vacancies_stored: usize,
    pub error: Option<String>,
}

impl EmployerIngestResult {
    pub fn success(employer_id: i64, employer_name: String, vacancies_stored: usize) -> Self {
        Self {
            employer_id,
            employer_name: Some(employer_name),
            vacancies_stored,
            error: None,
        }
    }

    pub fn failure(employer_id: i64, employer_name: Option<String>, error: String) -> Self {
        Self {
            employer_id,
            employer_name,
            vacancies_stored: 0,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-employer outcomes of one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub policy: FailurePolicy,
    /// Employers that were attempted, in processing order.
    pub results: Vec<EmployerIngestResult>,
    /// Employers never attempted because the run aborted.
    pub skipped: Vec<i64>,
}

impl IngestSummary {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn add(&mut self, result: EmployerIngestResult) {
        self.results.push(result);
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn successful_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    pub fn total_vacancies(&self) -> usize {
        self.results.iter().map(|r| r.vacancies_stored).sum()
    }

    pub fn is_aborted(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// True when every requested employer was ingested.
    pub fn is_complete_success(&self) -> bool {
        self.failed_count() == 0 && !self.is_aborted()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EmployerIngestResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}
