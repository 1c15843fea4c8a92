//! Client for the hh.ru employer and vacancy endpoints.
//!
//! API reference: <https://api.hh.ru/openapi/redoc>
//!
//! Two endpoints are used:
//! - `GET /employers/{id}` - a single employer
//! - `GET /vacancies?employer_id={id}&page={n}&per_page=100` - one page of
//!   open vacancies; the response carries the total number of `pages`

use std::time::Duration;

use hh_core::error::{AppError, FetchErrorDetails, FetchErrorKind};
use hh_core::{Employer, HttpConfig, Vacancy};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tokio::time::sleep;

/// hh.ru sends numeric identifiers as JSON strings (`"id": "1740"`). Accept
/// both forms.
fn de_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(i64),
        Str(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Num(n) => Ok(n),
        Id::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Employer as returned by `GET /employers/{id}`.
///
/// Only the fields that are stored are modeled; everything else in the
/// response is ignored.
///
/// # Examples
///
/// ```
/// use hh_client::hh::EmployerDto;
///
/// let json = r#"{
///     "id": "1740",
///     "name": "Yandex",
///     "description": "<p>Search engine</p>",
///     "alternate_url": "https://hh.ru/employer/1740",
///     "open_vacancies": 1200
/// }"#;
///
/// let dto: EmployerDto = serde_json::from_str(json).unwrap();
/// assert_eq!(dto.id, 1740);
/// assert_eq!(dto.name, "Yandex");
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct EmployerDto {
    #[serde(deserialize_with = "de_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Public page of the employer on the hh.ru website.
    pub alternate_url: String,
}

/// Salary block of a vacancy. Either bound may be `null`.
#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct SalaryDto {
    #[serde(default)]
    pub from: Option<i32>,
    #[serde(default)]
    pub to: Option<i32>,
}

/// One entry of a vacancy listing page.
#[derive(Deserialize, Debug, Clone)]
pub struct VacancyItem {
    #[serde(deserialize_with = "de_id")]
    pub id: i64,
    pub name: String,
    /// `null` or absent when the employer did not publish a salary.
    #[serde(default)]
    pub salary: Option<SalaryDto>,
    pub alternate_url: String,
}

/// Response of `GET /vacancies`.
#[derive(Deserialize, Debug)]
struct VacancyPage {
    items: Vec<VacancyItem>,
    /// Total number of pages for the query; `0` when nothing matches.
    pages: u32,
}

/// HTTP client for the hh.ru API.
///
/// # Examples
///
/// ```no_run
/// use hh_client::HhClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HhClient::new("https://api.hh.ru")?;
/// let employer = client.fetch_employer(1740).await?;
/// let vacancies = client.fetch_vacancies(employer.id).await?;
/// println!("{}: {} open vacancies", employer.name, vacancies.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HhClient {
    client: Client,
    base_url: Url,
    config: HttpConfig,
}

impl HhClient {
    /// Page size requested from `/vacancies`. hh.ru accepts at most 100.
    pub const PER_PAGE: u32 = 100;

    /// Delay between page requests.
    const PAGE_DELAY: Duration = Duration::from_millis(200);

    /// Upper bound for a single backoff sleep.
    const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

    /// Creates a client for `base_url` with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the URL cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_config(HttpConfig {
            base_url: base_url.to_string(),
            ..HttpConfig::default()
        })
    }

    /// Creates a client from a full [`HttpConfig`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if `config.base_url` cannot be parsed,
    /// or `AppError::ConfigError` if the HTTP client cannot be built.
    pub fn with_config(config: HttpConfig) -> Result<Self, AppError> {
        // Without the trailing slash, Url::join would drop the last path segment.
        let normalized = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|_| AppError::InvalidUrl(config.base_url.clone()))?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetches a single employer.
    ///
    /// # Errors
    ///
    /// `AppError::RemoteFetchError` on a non-success status (404 for an
    /// unknown employer), a network failure or a malformed body.
    pub async fn fetch_employer(&self, employer_id: i64) -> Result<Employer, AppError> {
        let url = self.endpoint(&format!("employers/{}", employer_id))?;
        let dto: EmployerDto = self.get_json(&url).await?;
        Ok(Self::into_employer(dto))
    }

    /// Fetches every open vacancy of an employer, page by page.
    ///
    /// Pages are requested in order starting at 0 until the last page
    /// announced by the API. Any failing page fails the whole call; already
    /// fetched pages are discarded.
    pub async fn fetch_vacancies(&self, employer_id: i64) -> Result<Vec<Vacancy>, AppError> {
        let mut vacancies = Vec::new();
        let mut page: u32 = 0;

        loop {
            let mut url = self.endpoint("vacancies")?;
            url.query_pairs_mut()
                .append_pair("employer_id", &employer_id.to_string())
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &Self::PER_PAGE.to_string());

            let body: VacancyPage = self.get_json(&url).await?;
            tracing::debug!(
                employer_id,
                page,
                pages = body.pages,
                items = body.items.len(),
                "Fetched vacancy page"
            );

            vacancies.extend(
                body.items
                    .into_iter()
                    .map(|item| Self::into_vacancy(item, employer_id)),
            );

            if page + 1 >= body.pages {
                break;
            }
            page += 1;

            sleep(Self::PAGE_DELAY).await;
        }

        Ok(vacancies)
    }

    /// Converts an employer DTO into the domain model. An empty description
    /// is treated as absent.
    pub fn into_employer(dto: EmployerDto) -> Employer {
        Employer {
            id: dto.id,
            name: dto.name,
            description: dto.description.filter(|d| !d.trim().is_empty()),
            url: dto.alternate_url,
        }
    }

    /// Converts a listing item into the domain model, owned by `employer_id`.
    ///
    /// The owner is the employer that was queried, not anything in the item.
    pub fn into_vacancy(item: VacancyItem, employer_id: i64) -> Vacancy {
        let salary = item.salary.unwrap_or_default();
        Vacancy {
            id: item.id,
            title: item.name,
            salary_from: salary.from,
            salary_to: salary.to,
            url: item.alternate_url,
            employer_id,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, AppError> {
        let resp = self.request_with_retry(url).await?;
        let bytes = resp.bytes().await.map_err(|e| {
            AppError::RemoteFetchError(FetchErrorDetails::new(
                FetchErrorKind::Network,
                format!("Failed to read response body from {}: {}", url, e),
                None,
            ))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::RemoteFetchError(FetchErrorDetails::parse(format!(
                "Unexpected response from {}: {}",
                url, e
            )))
        })
    }

    /// Sends a GET request, retrying transient failures.
    ///
    /// 429 and 5xx responses, timeouts and connection failures are retried
    /// with exponential backoff up to `max_retries` attempts in total. A
    /// `Retry-After` header on a 429 overrides the computed delay. Any other
    /// non-success status fails immediately.
    async fn request_with_retry(&self, url: &Url) -> Result<reqwest::Response, AppError> {
        let max_attempts = self.config.max_retries.max(1);
        let base_delay = self.config.retry_base_delay;
        let mut last_error = AppError::RemoteFetchError(FetchErrorDetails::new(
            FetchErrorKind::Network,
            "No attempts made",
            None,
        ));

        for attempt in 1..=max_attempts {
            let mut retry_after = None;

            match self.client.get(url.clone()).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        retry_after = resp
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.trim().parse::<u64>().ok())
                            .map(Duration::from_secs);
                    }

                    let reason = status.canonical_reason().unwrap_or("Unexpected status");
                    last_error = AppError::RemoteFetchError(FetchErrorDetails::http(
                        status.as_u16(),
                        format!("{} ({})", reason, url),
                    ));
                }
                Err(e) if e.is_timeout() => {
                    last_error = AppError::RemoteFetchError(FetchErrorDetails::new(
                        FetchErrorKind::Timeout,
                        format!("Request to {} timed out after {}s", url, self.config.timeout.as_secs()),
                        None,
                    ));
                }
                Err(e) if e.is_connect() => {
                    last_error = AppError::RemoteFetchError(FetchErrorDetails::new(
                        FetchErrorKind::Network,
                        format!("Connection failed: {}", e),
                        None,
                    ));
                }
                Err(e) => {
                    return Err(AppError::RemoteFetchError(FetchErrorDetails::new(
                        FetchErrorKind::Network,
                        e.to_string(),
                        None,
                    )));
                }
            }

            if !last_error.is_retryable() || attempt == max_attempts {
                break;
            }

            let delay = Self::retry_delay(base_delay, attempt, retry_after);
            tracing::warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %last_error,
                "Retrying request"
            );
            sleep(delay).await;
        }

        Err(last_error)
    }

    /// Sleep before the next attempt: the server's `Retry-After` if given,
    /// otherwise `base * 2^(attempt - 1)`. Never longer than `MAX_RETRY_DELAY`.
    fn retry_delay(base: Duration, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after
            .unwrap_or_else(|| base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1))))
            .min(Self::MAX_RETRY_DELAY)
    }
}

impl hh_core::traits::EmployerDirectory for HhClient {
    async fn fetch_employer(&self, employer_id: i64) -> Result<Employer, AppError> {
        HhClient::fetch_employer(self, employer_id).await
    }

    async fn fetch_vacancies(&self, employer_id: i64) -> Result<Vec<Vacancy>, AppError> {
        HhClient::fetch_vacancies(self, employer_id).await
    }
}
