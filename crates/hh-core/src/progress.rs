//! Progress reporting for the ingestion pipeline.
//!
//! [`IngestService`](crate::IngestService) emits [`IngestEvent`]s; frontends
//! decide what to do with them.

/// Something that happened while ingesting employers.
#[derive(Debug, Clone, Copy)]
pub enum IngestEvent<'a> {
    /// Processing of an employer begins. `index` is 1-based.
    EmployerStarted {
        employer_id: i64,
        index: usize,
        total: usize,
    },
    /// The employer record was fetched and stored.
    EmployerStored { employer_id: i64, name: &'a str },
    /// All vacancy pages were fetched.
    VacanciesFetched { employer_id: i64, count: usize },
    /// The employer and all its vacancies are stored.
    EmployerCompleted { employer_id: i64, vacancies: usize },
    /// Processing of the employer failed.
    EmployerFailed { employer_id: i64, error: &'a str },
    /// The loop stopped early; `remaining` employers were not attempted.
    Aborted { remaining: usize },
}

/// Receiver of pipeline progress events.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: IngestEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _event: IngestEvent<'_>) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: IngestEvent<'_>) {
        match event {
            IngestEvent::EmployerStarted {
                employer_id,
                index,
                total,
            } => {
                tracing::info!(employer_id, "[{}/{}] Processing employer {}", index, total, employer_id);
            }
            IngestEvent::EmployerStored { employer_id, name } => {
                tracing::info!(employer_id, name, "Stored employer");
            }
            IngestEvent::VacanciesFetched { employer_id, count } => {
                tracing::info!(employer_id, count, "Fetched {} vacancies", count);
            }
            IngestEvent::EmployerCompleted {
                employer_id,
                vacancies,
            } => {
                tracing::info!(employer_id, vacancies, "Stored {} vacancies", vacancies);
            }
            IngestEvent::EmployerFailed { employer_id, error } => {
                tracing::error!(employer_id, error, "Failed to ingest employer");
            }
            IngestEvent::Aborted { remaining } => {
                tracing::warn!(remaining, "Ingestion aborted, {} employers skipped", remaining);
            }
        }
    }
}
