// Async HTTP client for the clash-detection REST API.
//
// Base path: https://api.bentley.com/clashdetection
// Auth: `Authorization` header resolved per request from the shared slot.
// Version: pinned via the `Accept` media type.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Authorization;
use crate::error::Error;
use crate::models::{ClashResult, RunDetail, RunList, RunStarted, SuppressionRuleList, TestList};
use crate::requests::{RunRequest, TestDefinition};
use crate::transport::TransportConfig;

/// Production endpoint of the clash-detection service.
pub const DEFAULT_BASE_URL: &str = "https://api.bentley.com/clashdetection";

/// Media type pinning API version 1.
pub const DEFAULT_ACCEPT: &str = "application/vnd.bentley.itwin-platform.v1+json";

const PREFER_REPRESENTATION: &str = "return=representation";

// ── Error response shape from the service ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(serde::Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the clash-detection API.
///
/// Stateless apart from its configuration: every call resolves a fresh
/// token, performs exactly one request, and returns the parsed body or a
/// typed [`Error`]. There is no retry and no timeout.
pub struct ClashClient {
    http: reqwest::Client,
    base_url: Url,
    accept: HeaderValue,
    auth: Arc<Authorization>,
}

impl ClashClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a transport config.
    pub fn new(
        base_url: &str,
        accept: &str,
        auth: Arc<Authorization>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, accept, auth, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        accept: &str,
        auth: Arc<Authorization>,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        let accept = HeaderValue::from_str(accept)
            .map_err(|e| Error::MalformedInput(format!("invalid Accept media type: {e}")))?;
        Ok(Self {
            http,
            base_url,
            accept,
            auth,
        })
    }

    /// Ensure the base URL ends with a slash so relative joins append
    /// instead of replacing the last path segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The shared authorization slot.
    pub fn authorization(&self) -> &Arc<Authorization> {
        &self.auth
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn project_url(&self, path: &str, project_id: &str) -> Result<Url, Error> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().append_pair("projectId", project_id);
        Ok(url)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /tests?projectId={id}`
    pub async fn list_tests(&self, project_id: &str) -> Result<TestList, Error> {
        let url = self.project_url("tests", project_id)?;
        self.get(url).await
    }

    /// `GET /suppressionRules?projectId={id}`
    pub async fn list_suppression_rules(
        &self,
        project_id: &str,
    ) -> Result<SuppressionRuleList, Error> {
        let url = self.project_url("suppressionRules", project_id)?;
        self.get(url).await
    }

    /// `GET /runs?projectId={id}`
    pub async fn list_runs(&self, project_id: &str) -> Result<RunList, Error> {
        let url = self.project_url("runs", project_id)?;
        self.get(url).await
    }

    /// `POST /runs`
    pub async fn run_test(&self, request: &RunRequest) -> Result<RunStarted, Error> {
        let url = self.url("runs")?;
        self.post(url, request).await
    }

    /// `POST /tests`
    pub async fn create_test(&self, definition: &TestDefinition) -> Result<serde_json::Value, Error> {
        let url = self.url("tests")?;
        self.post(url, definition).await
    }

    /// `PUT /tests/{testId}`
    pub async fn update_test(
        &self,
        test_id: &str,
        definition: &TestDefinition,
    ) -> Result<serde_json::Value, Error> {
        let url = self.url(&format!("tests/{test_id}"))?;
        self.put(url, definition).await
    }

    /// `GET /runs/{runId}`
    pub async fn get_run_detail(&self, run_id: &str) -> Result<RunDetail, Error> {
        let url = self.url(&format!("runs/{run_id}"))?;
        self.get(url).await
    }

    /// `GET {url}`
    ///
    /// Follows an absolute result link from a previous response.
    /// Only the `Authorization` header is sent; result links point at
    /// storage that rejects the versioned `Accept` type.
    pub async fn get_result_by_url(&self, url: &str) -> Result<ClashResult, Error> {
        if url.trim().is_empty() {
            return Err(Error::MalformedInput("result link is empty".into()));
        }
        let url = Url::parse(url)?;
        let token = self.auth.access_token().await?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, token_header(token.expose_secret())?)
            .send()
            .await
            .inspect_err(|e| warn!(%url, error = %e, "result fetch failed"))?;
        self.handle_response(&url, resp).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let builder = self.authorized(self.http.get(url.clone())).await?;
        debug!("GET {url}");

        let resp = builder
            .send()
            .await
            .inspect_err(|e| warn!(%url, error = %e, "request failed"))?;
        self.handle_response(&url, resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let builder = self.authorized(self.http.post(url.clone()).json(body)).await?;
        debug!("POST {url}");

        let resp = builder
            .send()
            .await
            .inspect_err(|e| warn!(%url, error = %e, "request failed"))?;
        self.handle_response(&url, resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let builder = self.authorized(self.http.put(url.clone()).json(body)).await?;
        debug!("PUT {url}");

        let resp = builder
            .send()
            .await
            .inspect_err(|e| warn!(%url, error = %e, "request failed"))?;
        self.handle_response(&url, resp).await
    }

    /// Attach the token, the pinned `Accept` type and `Prefer`.
    async fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.auth.access_token().await?;
        Ok(builder
            .header(AUTHORIZATION, token_header(token.expose_secret())?)
            .header(ACCEPT, self.accept.clone())
            .header("Prefer", PREFER_REPRESENTATION))
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &Url,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                warn!(%url, error = %e, "response body is not the expected JSON");
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })
        } else {
            let err = self.parse_error(status, resp).await;
            warn!(%url, status = status.as_u16(), "error on fetch");
            Err(err)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|r| r.error)
            .map(|e| match (e.code, e.message) {
                (Some(code), Some(msg)) => format!("{code}: {msg}"),
                (None, Some(msg)) => msg,
                (Some(code), None) => code,
                (None, None) => status.to_string(),
            })
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        Error::Http {
            status: status.as_u16(),
            message,
        }
    }
}

fn token_header(token: &str) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(token).map_err(|e| Error::Authentication {
        message: format!("invalid access token header value: {e}"),
    })?;
    value.set_sensitive(true);
    Ok(value)
}
