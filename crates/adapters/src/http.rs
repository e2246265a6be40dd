//! Shared HTTP transport for vendor adapters.
//!
//! Wraps `reqwest` with a base URL, default headers, a per-request timeout,
//! exponential-backoff retry of transport failures and status-code
//! classification. Vendor adapters own one [`HttpClient`] each.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use pos_bridge_core::RateLimitInfo;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;
use url::Url;

/// Default `Retry-After` when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest error body kept in [`HttpError::Status`].
const MAX_ERROR_BODY: usize = 2048;

/// Errors from the HTTP transport.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network failure or timeout after all retries.
    #[error("Request failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// 404 from the vendor.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 401 or 403 from the vendor.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 409 from the vendor.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 429 from the vendor; seconds to wait before retrying.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request URL could not be built.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The underlying client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    /// A credential or vendor header is not a valid header value.
    #[error("Invalid header value for {0}")]
    Header(&'static str),
}

impl HttpError {
    /// Whether another attempt might succeed.
    ///
    /// Only transport failures are retried; every status the vendor
    /// actually returned is final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

// =============================================================================
// Retry policy
// =============================================================================

/// Exponential backoff for transport failures.
///
/// The delay before retry `n` (zero-based) is `base_delay * 2^n`, capped at
/// `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy with the default delays and `max_retries` retries.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before the retry following failed attempt `attempt`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's retries are exhausted.
///
/// # Errors
///
/// Returns the last error encountered.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, HttpError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, HttpError>>,
{
    let mut attempt = 0;
    loop {
        match operation(attempt + 1).await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(attempt = attempt + 1, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if error.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_retries + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// JSON-over-HTTP client bound to one vendor base URL.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    rate_limit: RwLock<Option<RateLimitInfo>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client.
    ///
    /// `headers` are sent with every request, typically authorization and
    /// vendor version headers.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the HTTP client fails to build.
    pub fn new(
        base_url: Url,
        headers: HeaderMap,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(HttpError::Build)?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                base_url,
                retry,
                rate_limit: RwLock::new(None),
            }),
        })
    }

    /// Vendor base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Rate-limit headers from the most recent response that carried them.
    pub async fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.inner.rate_limit.read().await.clone()
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` on transport failure, non-success status or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, HttpError> {
        self.execute(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` on transport failure, non-success status or an
    /// undecodable body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let body = encode(body)?;
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` on transport failure, non-success status or an
    /// undecodable body.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let body = encode(body)?;
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` on transport failure or non-success status.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.execute(Method::DELETE, path, &[], None).await
    }

    #[instrument(skip(self, query, body), fields(method = %method))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, HttpError> {
        let url = self.url_for(path)?;
        let started = Instant::now();

        let response = retry_with_backoff(&self.inner.retry, |attempts| {
            let mut request = self
                .inner
                .client
                .request(method.clone(), url.clone())
                .query(query);
            if let Some(body) = &body {
                request = request.json(body);
            }
            async move {
                request
                    .send()
                    .await
                    .map_err(|source| HttpError::Transport { attempts, source })
            }
        })
        .await?;

        let status = response.status();
        self.record_rate_limit(response.headers()).await;

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Vendor response"
        );

        if !status.is_success() {
            return Err(classify_failure(status, path, response).await);
        }

        let bytes = response.bytes().await.map_err(|e| HttpError::Transport {
            attempts: 1,
            source: e,
        })?;
        let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(payload).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode vendor response");
            HttpError::Decode(e.to_string())
        })
    }

    /// Join `path` onto the base URL, keeping any base path prefix.
    fn url_for(&self, path: &str) -> Result<Url, HttpError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn record_rate_limit(&self, headers: &HeaderMap) {
        if let Some(info) = parse_rate_limit(headers) {
            *self.inner.rate_limit.write().await = Some(info);
        }
    }
}

/// Default headers for a bearer-authenticated vendor API.
///
/// The token is marked sensitive so it never appears in debug output.
///
/// # Errors
///
/// Returns `HttpError::Header` if the token or an extra value contains
/// characters not allowed in a header.
pub fn bearer_headers(
    token: &str,
    extra: &[(&'static str, &str)],
) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| HttpError::Header("Authorization"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    for &(name, value) in extra {
        let value = HeaderValue::from_str(value).map_err(|_| HttpError::Header(name))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, HttpError> {
    serde_json::to_value(body).map_err(|e| HttpError::Decode(format!("request body: {e}")))
}

async fn classify_failure(status: StatusCode, path: &str, response: reqwest::Response) -> HttpError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return HttpError::RateLimited(retry_after);
    }

    let mut body = response.text().await.unwrap_or_default();
    truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
    tracing::error!(status = status.as_u16(), body = %body, "Vendor request failed");

    match status {
        StatusCode::NOT_FOUND => HttpError::NotFound(path.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HttpError::Unauthorized(body),
        StatusCode::CONFLICT => HttpError::Conflict(body),
        _ => HttpError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
}

/// Read `X-RateLimit-Limit`, `-Remaining` and `-Reset` (epoch seconds).
fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let number = |name: &str| -> Option<u64> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    };

    let limit = number("x-ratelimit-limit")?;
    let remaining = number("x-ratelimit-remaining")?;
    let reset_at = number("x-ratelimit-reset")
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
    })
}
