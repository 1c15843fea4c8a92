//! Integration tests for bootstrap, schema and CatalogRepository.

use hh_core::{AppError, CatalogStore, Employer, EmployerDirectory, IngestService, Vacancy};
use hh_db::{Database, ensure_database_exists, ensure_schema};

use crate::integration::common::{employer, seed, setup_test_db, vacancy};

#[tokio::test]
async fn test_ensure_database_exists_is_idempotent() {
    let test_db = setup_test_db().await;

    let created = ensure_database_exists(&test_db.config).await.unwrap();
    assert!(!created, "second call must not create the database again");

    let other = test_db.config.with_database("hh_other");
    assert!(ensure_database_exists(&other).await.unwrap());
    assert!(!ensure_database_exists(&other).await.unwrap());
}

#[tokio::test]
async fn test_ensure_database_exists_rejects_bad_name() {
    let test_db = setup_test_db().await;
    let bad = test_db.config.with_database("x\"; DROP DATABASE postgres; --");

    let err = ensure_database_exists(&bad).await.unwrap_err();

    assert!(matches!(err, AppError::ConfigError(_)));
}

#[tokio::test]
async fn test_ensure_schema_twice() {
    let test_db = setup_test_db().await;

    ensure_schema(test_db.db.pool())
        .await
        .expect("schema creation must be repeatable");
}

#[tokio::test]
async fn test_connect_to_missing_database() {
    let test_db = setup_test_db().await;
    let missing = test_db.config.with_database("does_not_exist");

    let err = Database::connect(&missing).await.unwrap_err();

    assert!(matches!(err, AppError::ConnectionError(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let test_db = setup_test_db().await;
    let db = Database::connect(&test_db.config).await.unwrap();

    db.close().await;
    assert!(db.is_closed());
    db.close().await;
    assert!(db.is_closed());
}

#[tokio::test]
async fn test_upsert_employer_last_write_wins() {
    let test_db = setup_test_db().await;
    let repo = test_db.catalog();

    repo.upsert_employer(&employer(1740, "Yandex")).await.unwrap();
    let renamed = Employer {
        id: 1740,
        name: "Yandex LLC".to_string(),
        description: None,
        url: "https://hh.ru/employer/1740?new".to_string(),
    };
    repo.upsert_employer(&renamed).await.unwrap();

    let stored = repo.get_employer(1740).await.unwrap().unwrap();
    assert_eq!(stored, renamed);
}

#[tokio::test]
async fn test_upsert_vacancy_last_write_wins() {
    let test_db = setup_test_db().await;
    let repo = test_db.catalog();
    seed(
        &repo,
        &[employer(1, "Alpha"), employer(2, "Beta")],
        &[vacancy(10, 1, "Python Developer", Some(100), Some(200))],
    )
    .await;

    let moved = vacancy(10, 2, "Senior Python Developer", None, Some(400));
    repo.upsert_vacancy(&moved).await.unwrap();

    let stored = repo.get_vacancy(10).await.unwrap().unwrap();
    assert_eq!(stored, moved);
    assert!(repo.vacancies_for_employer(1).await.unwrap().is_empty());
    assert_eq!(repo.vacancies_for_employer(2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_vacancy_without_employer_is_integrity_violation() {
    let test_db = setup_test_db().await;
    let repo = test_db.catalog();

    let err = repo
        .upsert_vacancy(&vacancy(10, 404, "Orphan", None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::IntegrityViolation(_)), "got {:?}", err);
    assert!(repo.get_vacancy(10).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_rows_are_none() {
    let test_db = setup_test_db().await;
    let repo = test_db.catalog();

    assert!(repo.get_employer(1).await.unwrap().is_none());
    assert!(repo.get_vacancy(1).await.unwrap().is_none());
}

/// Directory returning fixed data, to run the pipeline against real tables.
#[derive(Clone)]
struct FixedDirectory;

impl EmployerDirectory for FixedDirectory {
    async fn fetch_employer(&self, employer_id: i64) -> Result<Employer, AppError> {
        Ok(employer(employer_id, &format!("Employer {}", employer_id)))
    }

    async fn fetch_vacancies(&self, employer_id: i64) -> Result<Vec<Vacancy>, AppError> {
        Ok((0..3)
            .map(|i| vacancy(employer_id * 100 + i, employer_id, "Engineer", Some(100), None))
            .collect())
    }
}

#[tokio::test]
async fn test_ingest_service_against_postgres() {
    let test_db = setup_test_db().await;
    let repo = test_db.catalog();
    let service = IngestService::new(FixedDirectory, repo.clone());

    let summary = service.ingest_all(&[1, 2]).await;
    let again = service.ingest_all(&[1, 2]).await;

    assert!(summary.is_complete_success());
    assert!(again.is_complete_success());
    assert_eq!(repo.vacancies_for_employer(1).await.unwrap().len(), 3);
    assert_eq!(repo.vacancies_for_employer(2).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_catalog_store_trait_delegates() {
    let test_db = setup_test_db().await;
    let repo = test_db.catalog();

    CatalogStore::upsert_employer(&repo, &employer(5, "Gamma"))
        .await
        .unwrap();

    assert_eq!(repo.get_employer(5).await.unwrap().unwrap().name, "Gamma");
}
