use std::time::Duration;

use forgeprops_domain::constants::{
    DEFAULT_HTTP_BASE_BACKOFF_MS, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS,
};
use forgeprops_domain::{ConfigError, HttpSettings, WrapperError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::errors::{status_to_wrapper_error, InfraError};

/// HTTP client bound to one API base URL, with optional retry and timeout
/// support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: Url,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder(base_url: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder::new(base_url)
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path relative to the base URL.
    ///
    /// # Errors
    /// Returns [`WrapperError::Upstream`] if the path cannot be joined.
    pub fn url(&self, path: &str) -> Result<Url, WrapperError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| WrapperError::Upstream(format!("invalid request path {path}: {err}")))
    }

    /// Create a request builder for an API path.
    ///
    /// # Errors
    /// Returns [`WrapperError::Upstream`] if the path cannot be joined.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, WrapperError> {
        Ok(self.client.request(method, self.url(path)?))
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// # Errors
    /// Returns the mapped transport error once attempts are exhausted.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, WrapperError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                WrapperError::Upstream(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(|err| WrapperError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt + 1 < attempts {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(WrapperError::Upstream("http client exhausted retries without producing a result".into()))
    }

    /// GET an API path and decode the JSON body.
    ///
    /// Non-success statuses are mapped through
    /// [`status_to_wrapper_error`], so a 404 becomes
    /// [`WrapperError::NotFound`].
    ///
    /// # Errors
    /// Returns a transport, status or decode error.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, WrapperError>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(builder).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_to_wrapper_error(status, response.headers(), path));
        }

        response.json::<T>().await.map_err(|err| InfraError::from(err).into())
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    bearer_token: Option<String>,
    default_headers: HeaderMap,
}

impl HttpClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_HTTP_BASE_BACKOFF_MS),
            user_agent: None,
            bearer_token: None,
            default_headers: HeaderMap::new(),
        }
    }

    /// Apply timeout, attempts, backoff and user agent from settings.
    #[must_use]
    pub fn settings(self, settings: &HttpSettings) -> Self {
        self.timeout(Duration::from_secs(settings.timeout_secs))
            .max_attempts(settings.max_attempts)
            .base_backoff(Duration::from_millis(settings.base_backoff_ms))
            .user_agent(settings.user_agent.clone())
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Token sent as `Authorization: Bearer ...` on every request.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.default_headers.insert(name, HeaderValue::from_static(value));
        self
    }

    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an unusable base URL, token or
    /// TLS backend.
    pub fn build(self) -> Result<HttpClient, ConfigError> {
        let base_url = parse_base_url(&self.base_url)?;

        let mut headers = self.default_headers;
        if let Some(token) = self.bearer_token.filter(|token| !token.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ConfigError::Invalid("access token contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).no_proxy().default_headers(headers);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|err| ConfigError::Invalid(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            client,
            base_url,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

/// Parse the endpoint and make sure relative joins append to its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash =
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{trimmed}/") };

    Url::parse(&with_slash)
        .map_err(|err| ConfigError::Invalid(format!("invalid API endpoint {raw:?}: {err}")))
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}
