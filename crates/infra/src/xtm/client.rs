//! Typed accessors over the XTM Cloud REST API.
//!
//! Every network call goes through the retry executor with
//! [`ApiRetryPolicy`]: transient failures (timeouts, connection errors,
//! 5xx, 429) back off and retry; any other 4xx propagates immediately.
//! Payloads are decoded defensively - an unexpected shape is "no data",
//! never an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use transtat_common::resilience::retry::{
    RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
};
use transtat_core::ProjectsGateway;
use transtat_domain::{
    ApiConfig, LanguageStatistic, Project, ProjectStatus, ReportError, Result, RetryTuning,
};

const USER_AGENT: &str = concat!("transtat/", env!("CARGO_PKG_VERSION"));

/// Retry policy over [`ReportError`].
///
/// Delegates to [`ReportError::is_transient`], which encodes the
/// classification contract: network failures, 5xx and 429 retry;
/// everything else stops on first sight.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiRetryPolicy;

impl RetryPolicy<ReportError> for ApiRetryPolicy {
    fn should_retry(&self, error: &ReportError, _attempt: u32) -> RetryDecision {
        if error.is_transient() {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}

/// Client for the XTM project-management API.
pub struct XtmClient {
    http: crate::http::HttpClient,
    base_url: String,
    retry: RetryConfig,
    excluded_users: Vec<String>,
}

impl XtmClient {
    /// Build a client from configuration.
    ///
    /// `excluded_users` is the account list whose work never reaches the
    /// aggregation; comparison is case-insensitive.
    pub fn new(api: &ApiConfig, tuning: &RetryTuning, excluded_users: Vec<String>) -> Result<Self> {
        let http = crate::http::HttpClient::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .auth(&api.auth_scheme, &api.auth_token)
            .user_agent(USER_AGENT)
            .build()?;

        let retry = RetryConfig::builder()
            .max_attempts(tuning.max_attempts)
            .exponential_backoff(
                Duration::from_millis(tuning.initial_delay_ms),
                tuning.backoff_factor,
                Duration::from_millis(tuning.max_delay_ms),
            )
            .build()
            .map_err(|err| ReportError::Config(format!("{err:?}")))?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            retry,
            excluded_users,
        })
    }

    /// Lightweight connectivity probe used by the preflight checker.
    /// Single attempt, no retries - preflight wants a quick answer.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/projects?page=1&pageSize=1", self.base_url);
        self.http.send(self.http.request(Method::GET, &url)).await?;
        Ok(())
    }

    /// List projects, optionally filtered by status server-side.
    pub async fn fetch_projects(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>> {
        let endpoint = match status.and_then(ProjectStatus::as_query) {
            Some(filter) => format!("projects?status={filter}"),
            None => "projects".to_string(),
        };

        let body = self.get_text(&endpoint).await?;
        let projects = decode_list::<Project>(&body);
        debug!(count = projects.len(), "retrieved projects");
        Ok(projects)
    }

    /// Per-language statistics for one project with `excluded` accounts
    /// filtered out (case-insensitive). A language entry emptied by the
    /// exclusion is dropped entirely, not kept with zero users.
    pub async fn fetch_statistics(
        &self,
        project_id: i64,
        excluded: &[String],
    ) -> Result<Vec<LanguageStatistic>> {
        let endpoint = format!("projects/{project_id}/statistics");
        let body = self.get_text(&endpoint).await?;
        let stats = decode_list::<LanguageStatistic>(&body);
        Ok(filter_excluded_users(stats, excluded))
    }

    /// GET `endpoint` under the configured base URL, with retries.
    async fn get_text(&self, endpoint: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let executor =
            RetryExecutor::new(self.retry.clone(), ApiRetryPolicy).with_label(endpoint);

        let http = &self.http;
        let url_ref = url.as_str();
        let outcome = executor
            .execute(move || async move {
                let response = http.send(http.request(Method::GET, url_ref)).await?;
                response.text().await.map_err(|err| {
                    ReportError::Network(format!("failed to read response body: {err}"))
                })
            })
            .await;

        outcome.map_err(flatten_retry_error)
    }
}

#[async_trait]
impl ProjectsGateway for XtmClient {
    async fn list_projects(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>> {
        self.fetch_projects(status).await
    }

    async fn project_statistics(&self, project_id: i64) -> Result<Vec<LanguageStatistic>> {
        self.fetch_statistics(project_id, &self.excluded_users).await
    }
}

/// Collapse the retry wrapper back into the underlying error.
fn flatten_retry_error(err: RetryError<ReportError>) -> ReportError {
    match err {
        RetryError::NonRetryable { source }
        | RetryError::AttemptsExhausted { source, .. } => source,
        RetryError::InvalidConfiguration { message } => ReportError::Config(message),
    }
}

/// Decode a payload that should be a JSON array.
///
/// The API occasionally answers with a bare object (treated as a
/// one-element list) or something unexpected entirely (treated as
/// empty). Tolerating the malformed shapes here is what lets a single
/// odd project degrade to "no data" instead of failing the run.
fn decode_list<T: DeserializeOwned>(body: &str) -> Vec<T> {
    if let Ok(list) = serde_json::from_str::<Vec<T>>(body) {
        return list;
    }
    if let Ok(single) = serde_json::from_str::<T>(body) {
        return vec![single];
    }
    warn!("unexpected payload shape, treating as empty");
    Vec::new()
}

/// Drop excluded accounts from each language entry.
fn filter_excluded_users(
    stats: Vec<LanguageStatistic>,
    excluded: &[String],
) -> Vec<LanguageStatistic> {
    if excluded.is_empty() {
        return stats;
    }

    let excluded_lower: Vec<String> = excluded.iter().map(|user| user.to_lowercase()).collect();

    stats
        .into_iter()
        .filter_map(|mut lang| {
            lang.users_statistics
                .retain(|user| !excluded_lower.contains(&user.username.to_lowercase()));
            if lang.users_statistics.is_empty() {
                None
            } else {
                Some(lang)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn test_client(server_uri: &str, max_attempts: u32) -> XtmClient {
        let api = ApiConfig {
            base_url: server_uri.to_string(),
            auth_scheme: "Bearer".to_string(),
            auth_token: "token".to_string(),
            timeout_secs: 5,
        };
        let tuning = RetryTuning {
            max_attempts,
            initial_delay_ms: 1,
            backoff_factor: 1.0,
            max_delay_ms: 10,
        };
        XtmClient::new(&api, &tuning, vec!["ProjectAdmin".to_string()])
            .expect("client should build")
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(move |_req: &Request| {
                let current = attempts_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if current < 2 {
                    ResponseTemplate::new(500)
                } else {
                    ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "p"}]))
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 5);
        let projects = client.fetch_projects(None).await.expect("should succeed after retries");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, Some(1));
    }

    #[tokio::test]
    async fn throttling_is_retried() {
        let server = MockServer::start().await;
        let attempts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(move |_req: &Request| {
                if attempts_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(429)
                } else {
                    ResponseTemplate::new(200).set_body_json(json!([]))
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 3);
        client.fetch_projects(None).await.expect("429 should be retried");
    }

    /// Retry law: a 4xx other than 429 is permanent - exactly one
    /// request, error propagated.
    #[tokio::test]
    async fn client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/7/statistics"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 5);
        let err = client
            .fetch_statistics(7, &[])
            .await
            .expect_err("404 should propagate");
        assert!(matches!(err, ReportError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 2);
        let err = client.fetch_projects(None).await.expect_err("should exhaust");
        assert!(matches!(err, ReportError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn status_filter_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("status", "FINISHED"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        client
            .fetch_projects(Some(ProjectStatus::Finished))
            .await
            .expect("filtered listing should succeed");
    }

    #[tokio::test]
    async fn single_object_payload_is_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 9, "name": "solo"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let projects = client.fetch_projects(None).await.expect("should succeed");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, Some(9));
    }

    #[tokio::test]
    async fn garbage_payload_decodes_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let projects = client.fetch_projects(None).await.expect("should succeed");
        assert!(projects.is_empty());
    }

    fn stats_payload() -> serde_json::Value {
        json!([
            {
                "targetLanguage": "fr_FR",
                "usersStatistics": [
                    {"username": "alice@example.com", "stepsStatistics": []},
                    {"username": "PROJECTADMIN", "stepsStatistics": []}
                ]
            },
            {
                "targetLanguage": "de_DE",
                "usersStatistics": [
                    {"username": "projectadmin", "stepsStatistics": []}
                ]
            }
        ])
    }

    /// Excluded-user law: the match is case-insensitive, and a language
    /// entry emptied by the exclusion disappears.
    #[tokio::test]
    async fn excluded_users_are_filtered_case_insensitively() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/3/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_payload()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let stats = client
            .fetch_statistics(3, &["ProjectAdmin".to_string()])
            .await
            .expect("should succeed");

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].target_language, "fr_FR");
        assert_eq!(stats[0].users_statistics.len(), 1);
        assert_eq!(stats[0].users_statistics[0].username, "alice@example.com");
    }

    /// The gateway implementation applies the configured exclusion list.
    #[tokio::test]
    async fn gateway_uses_configured_exclusions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/3/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_payload()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let stats = ProjectsGateway::project_statistics(&client, 3)
            .await
            .expect("should succeed");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].target_language, "fr_FR");
    }

    #[tokio::test]
    async fn empty_exclusion_list_keeps_everyone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/3/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_payload()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let stats = client.fetch_statistics(3, &[]).await.expect("should succeed");
        assert_eq!(stats.len(), 2);
    }

    #[tokio::test]
    async fn ping_succeeds_against_healthy_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        client.ping().await.expect("ping should succeed");
    }
}
