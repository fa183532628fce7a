//! Thin reqwest wrapper: timeout, default headers, error classification.
//!
//! This transport performs exactly one attempt per `send` and maps every
//! outcome into [`ReportError`], so the retry executor one layer up can
//! see and classify each individual failure. Putting a retry loop in
//! here as well would double-retry.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use transtat_domain::{ReportError, Result};

/// Maximum number of body bytes copied into an API error message.
const ERROR_BODY_LIMIT: usize = 256;

/// HTTP client configured for one remote API.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute one attempt.
    ///
    /// Transport failures become [`ReportError::Network`]; non-success
    /// statuses become [`ReportError::Api`] carrying the status code so
    /// the caller's retry policy can tell 5xx/429 from the rest.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(classify_transport_error)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(classify_transport_error)?;
        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ReportError::Api { status: status.as_u16(), message: truncate(&body) })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    auth_header: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None, auth_header: None }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Send `Authorization: {scheme} {token}` on every request.
    pub fn auth(mut self, scheme: &str, token: &str) -> Self {
        self.auth_header = Some(format!("{scheme} {token}"));
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = self.auth_header {
            let mut value = HeaderValue::from_str(&auth).map_err(|_| {
                ReportError::Config("auth scheme/token contains invalid header characters".into())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).default_headers(headers).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|err| ReportError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client })
    }
}

/// Map a reqwest failure into the domain taxonomy.
///
/// Timeouts and connection problems are transient network failures; a
/// request that could not even be built is a programming error and must
/// not be retried.
fn classify_transport_error(err: reqwest::Error) -> ReportError {
    if err.is_timeout() {
        ReportError::Network("HTTP request timed out".into())
    } else if err.is_connect() {
        ReportError::Network(format!("connection failed: {err}"))
    } else if err.is_builder() {
        ReportError::Internal(format!("malformed request: {err}"))
    } else {
        ReportError::Network(format!("HTTP transport error: {err}"))
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        body.to_string()
    } else {
        let mut end = ERROR_BODY_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}
