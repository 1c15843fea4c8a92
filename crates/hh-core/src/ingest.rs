//! Ingestion service: fetch employers and their vacancies, store them.
//!
//! [`IngestService`] is generic over:
//! - [`EmployerDirectory`] - where records come from
//! - [`CatalogStore`] - where records go
//!
//! Employers are processed one at a time, in the order given. For each one the
//! employer record is stored before any of its vacancies, so the foreign key
//! from `vacancies` to `companies` always holds.
//!
//! # Failure handling
//!
//! The [`FailurePolicy`] decides what a failed employer means for the rest of
//! the run. With [`FailurePolicy::AbortOnError`] the remaining employers are
//! skipped; with [`FailurePolicy::ContinueOnError`] they are still attempted.
//! In both cases the returned [`IngestSummary`] lists what happened to each
//! employer. A failure while fetching vacancies leaves the already-stored
//! employer row in place and writes none of that employer's vacancies.

use crate::progress::{IngestEvent, ProgressReporter, SilentReporter};
use crate::summary::{EmployerIngestResult, FailurePolicy, IngestSummary};
use crate::traits::{CatalogStore, EmployerDirectory};
use crate::{AppError, Employer};

/// Stored employer plus the number of vacancies written for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedEmployer {
    pub employer: Employer,
    pub vacancies_stored: usize,
}

/// Error from a single employer, with the name if it was already known.
#[derive(Debug)]
struct EmployerIngestError {
    employer_name: Option<String>,
    source: AppError,
}

/// Service that drains the directory into the store.
///
/// # Example
///
/// ```ignore
/// use hh_core::{FailurePolicy, IngestService, TracingReporter};
///
/// let service = IngestService::new(hh_client, catalog_repo)
///     .with_policy(FailurePolicy::ContinueOnError);
/// let summary = service.ingest_all_with_progress(&[1740, 3529], &TracingReporter).await;
/// println!("{} vacancies stored", summary.total_vacancies());
/// ```
#[derive(Clone)]
pub struct IngestService<D, S>
where
    D: EmployerDirectory,
    S: CatalogStore,
{
    directory: D,
    store: S,
    policy: FailurePolicy,
}

impl<D, S> IngestService<D, S>
where
    D: EmployerDirectory,
    S: CatalogStore,
{
    pub fn new(directory: D, store: S) -> Self {
        Self {
            directory,
            store,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fetches and stores one employer and all of its vacancies.
    pub async fn ingest_employer(&self, employer_id: i64) -> Result<IngestedEmployer, AppError> {
        self.ingest_employer_with_progress(employer_id, &SilentReporter)
            .await
            .map_err(|e| e.source)
    }

    async fn ingest_employer_with_progress<R: ProgressReporter>(
        &self,
        employer_id: i64,
        reporter: &R,
    ) -> Result<IngestedEmployer, EmployerIngestError> {
        let employer = self
            .directory
            .fetch_employer(employer_id)
            .await
            .map_err(|source| EmployerIngestError {
                employer_name: None,
                source,
            })?;

        let named_error = |source: AppError| EmployerIngestError {
            employer_name: Some(employer.name.clone()),
            source,
        };

        self.store
            .upsert_employer(&employer)
            .await
            .map_err(named_error)?;
        reporter.report(IngestEvent::EmployerStored {
            employer_id,
            name: &employer.name,
        });

        let vacancies = self
            .directory
            .fetch_vacancies(employer_id)
            .await
            .map_err(named_error)?;
        reporter.report(IngestEvent::VacanciesFetched {
            employer_id,
            count: vacancies.len(),
        });

        for vacancy in &vacancies {
            self.store
                .upsert_vacancy(vacancy)
                .await
                .map_err(named_error)?;
        }

        Ok(IngestedEmployer {
            vacancies_stored: vacancies.len(),
            employer,
        })
    }

    /// Ingests every employer in `employer_ids`, honoring the failure policy.
    pub async fn ingest_all(&self, employer_ids: &[i64]) -> IngestSummary {
        self.ingest_all_with_progress(employer_ids, &SilentReporter)
            .await
    }

    /// Same as [`ingest_all`](Self::ingest_all), emitting progress events.
    pub async fn ingest_all_with_progress<R: ProgressReporter>(
        &self,
        employer_ids: &[i64],
        reporter: &R,
    ) -> IngestSummary {
        let mut summary = IngestSummary::new(self.policy);
        let total = employer_ids.len();

        for (i, &employer_id) in employer_ids.iter().enumerate() {
            reporter.report(IngestEvent::EmployerStarted {
                employer_id,
                index: i + 1,
                total,
            });

            match self
                .ingest_employer_with_progress(employer_id, reporter)
                .await
            {
                Ok(done) => {
                    reporter.report(IngestEvent::EmployerCompleted {
                        employer_id,
                        vacancies: done.vacancies_stored,
                    });
                    summary.add(EmployerIngestResult::success(
                        employer_id,
                        done.employer.name,
                        done.vacancies_stored,
                    ));
                }
                Err(err) => {
                    let message = err.source.to_string();
                    reporter.report(IngestEvent::EmployerFailed {
                        employer_id,
                        error: &message,
                    });
                    summary.add(EmployerIngestResult::failure(
                        employer_id,
                        err.employer_name,
                        message,
                    ));

                    if self.policy == FailurePolicy::AbortOnError {
                        summary.skipped = employer_ids[i + 1..].to_vec();
                        if !summary.skipped.is_empty() {
                            reporter.report(IngestEvent::Aborted {
                                remaining: summary.skipped.len(),
                            });
                        }
                        break;
                    }
                }
            }
        }

        summary
    }
}
