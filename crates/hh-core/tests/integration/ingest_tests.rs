//! Integration tests for IngestService.

use std::sync::Mutex;

use hh_core::{
    AppError, FailurePolicy, IngestEvent, IngestService, ProgressReporter, TracingReporter,
};

use crate::integration::common::{MockCatalogStore, MockDirectory, employer, vacancy};

fn two_employers() -> MockDirectory {
    MockDirectory::new()
        .with_employer(
            employer(1, "Alpha"),
            vec![
                vacancy(10, 1, "Python Developer", Some(100), Some(200)),
                vacancy(11, 1, "QA Engineer", None, None),
            ],
        )
        .with_employer(
            employer(2, "Beta"),
            vec![vacancy(20, 2, "Data Engineer", Some(150), None)],
        )
}

#[tokio::test]
async fn test_ingest_stores_employers_and_vacancies() {
    let store = MockCatalogStore::new();
    let service = IngestService::new(two_employers(), store.clone());

    let summary = service.ingest_all(&[1, 2]).await;

    assert!(summary.is_complete_success());
    assert_eq!(summary.total_vacancies(), 3);
    assert_eq!(store.employer_count(), 2);
    assert_eq!(store.vacancy_count(), 3);
    assert_eq!(store.vacancy(11).unwrap().salary_from, None);
    assert_eq!(store.employer(2).unwrap().name, "Beta");
}

#[tokio::test]
async fn test_employer_written_before_its_vacancies() {
    let store = MockCatalogStore::new();
    let service = IngestService::new(two_employers(), store.clone());

    service.ingest_all(&[1, 2]).await;

    assert_eq!(
        store.write_log(),
        vec![
            ("employer", 1),
            ("vacancy", 10),
            ("vacancy", 11),
            ("employer", 2),
            ("vacancy", 20),
        ]
    );
}

#[tokio::test]
async fn test_employers_processed_in_given_order() {
    let directory = two_employers();
    let service = IngestService::new(directory.clone(), MockCatalogStore::new());

    service.ingest_all(&[2, 1]).await;

    assert_eq!(directory.requested(), vec![2, 1]);
}

#[tokio::test]
async fn test_repeated_ingest_is_idempotent() {
    let store = MockCatalogStore::new();
    let service = IngestService::new(two_employers(), store.clone());

    service.ingest_all(&[1, 2]).await;
    let summary = service.ingest_all(&[1, 2]).await;

    assert!(summary.is_complete_success());
    assert_eq!(store.employer_count(), 2);
    assert_eq!(store.vacancy_count(), 3);
}

#[tokio::test]
async fn test_abort_on_error_skips_remaining_employers() {
    // employer 99 is unknown to the directory
    let store = MockCatalogStore::new();
    let service = IngestService::new(two_employers(), store.clone());

    let summary = service.ingest_all(&[1, 99, 2]).await;

    assert!(summary.is_aborted());
    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.successful_count(), 1);
    assert_eq!(summary.skipped, vec![2]);
    assert!(store.employer(1).is_some());
    assert!(store.employer(2).is_none());

    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.employer_id, 99);
    assert!(failure.employer_name.is_none());
    assert!(failure.error.as_deref().unwrap().contains("404"));
}

#[tokio::test]
async fn test_continue_on_error_attempts_every_employer() {
    let store = MockCatalogStore::new();
    let service = IngestService::new(two_employers(), store.clone())
        .with_policy(FailurePolicy::ContinueOnError);

    let summary = service.ingest_all(&[99, 1, 2]).await;

    assert!(!summary.is_aborted());
    assert_eq!(summary.attempted(), 3);
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.successful_count(), 2);
    assert_eq!(store.employer_count(), 2);
    assert!(!summary.is_complete_success());
}

#[tokio::test]
async fn test_vacancy_fetch_failure_keeps_employer_row_only() {
    let store = MockCatalogStore::new();
    let directory = two_employers().with_failing_vacancies(1);
    let service =
        IngestService::new(directory, store.clone()).with_policy(FailurePolicy::ContinueOnError);

    let summary = service.ingest_all(&[1, 2]).await;

    assert_eq!(summary.failed_count(), 1);
    assert!(store.employer(1).is_some());
    assert_eq!(store.vacancies_of(1), 0);
    assert_eq!(store.vacancies_of(2), 1);

    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.employer_name.as_deref(), Some("Alpha"));
}

#[tokio::test]
async fn test_ingest_employer_propagates_remote_error() {
    let service = IngestService::new(two_employers(), MockCatalogStore::new());

    let err = service.ingest_employer(404404).await.unwrap_err();

    assert!(matches!(err, AppError::RemoteFetchError(_)));
}

#[tokio::test]
async fn test_ingest_employer_returns_stored_count() {
    let service = IngestService::new(two_employers(), MockCatalogStore::new());

    let done = service.ingest_employer(1).await.unwrap();

    assert_eq!(done.employer.name, "Alpha");
    assert_eq!(done.vacancies_stored, 2);
}

#[tokio::test]
async fn test_vacancy_reassigned_to_new_employer() {
    // vacancy 10 moves from employer 1 to employer 2 between runs
    let store = MockCatalogStore::new();
    IngestService::new(two_employers(), store.clone())
        .ingest_all(&[1, 2])
        .await;

    let moved = MockDirectory::new().with_employer(
        employer(2, "Beta"),
        vec![vacancy(10, 2, "Python Developer", Some(120), Some(220))],
    );
    IngestService::new(moved, store.clone())
        .ingest_all(&[2])
        .await;

    let stored = store.vacancy(10).unwrap();
    assert_eq!(stored.employer_id, 2);
    assert_eq!(stored.salary_from, Some(120));
    assert_eq!(store.vacancy_count(), 3);
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: IngestEvent<'_>) {
        let label = match event {
            IngestEvent::EmployerStarted { employer_id, .. } => format!("start {}", employer_id),
            IngestEvent::EmployerStored { employer_id, .. } => format!("stored {}", employer_id),
            IngestEvent::VacanciesFetched { count, .. } => format!("fetched {}", count),
            IngestEvent::EmployerCompleted { employer_id, .. } => format!("done {}", employer_id),
            IngestEvent::EmployerFailed { employer_id, .. } => format!("failed {}", employer_id),
            IngestEvent::Aborted { remaining } => format!("aborted {}", remaining),
        };
        self.events.lock().unwrap().push(label);
    }
}

#[tokio::test]
async fn test_progress_events_in_order() {
    let reporter = RecordingReporter::default();
    let service = IngestService::new(two_employers(), MockCatalogStore::new());

    service
        .ingest_all_with_progress(&[1, 99, 2], &reporter)
        .await;

    assert_eq!(
        *reporter.events.lock().unwrap(),
        vec![
            "start 1",
            "stored 1",
            "fetched 2",
            "done 1",
            "start 99",
            "failed 99",
            "aborted 1",
        ]
    );
}

#[tokio::test]
async fn test_tracing_reporter_does_not_change_outcome() {
    let service = IngestService::new(two_employers(), MockCatalogStore::new());

    let summary = service
        .ingest_all_with_progress(&[1, 2], &TracingReporter)
        .await;

    assert_eq!(summary.total_vacancies(), 3);
}
