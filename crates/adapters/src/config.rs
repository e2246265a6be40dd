//! POS configuration, raw and normalized.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POS_PROVIDER` - `square`, `toast` or `mock`
//! - `POS_ENVIRONMENT` - `sandbox` or `production`
//! - `POS_API_KEY` - Vendor access token (not needed for `mock`)
//! - `POS_API_SECRET` - Restaurant external id (`toast` only)
//!
//! ## Optional
//! - `POS_BASE_URL` - Override the vendor base URL
//! - `POS_TIMEOUT_MS` - Request timeout (default: 30000)
//! - `POS_RETRY_ATTEMPTS` - Transport retries (default: 3)
//! - `POS_WEBHOOK_URL` - Callback URL for vendor notifications
//!
//! Loading never applies validation rules; [`crate::AdapterFactory`] does.

use std::time::Duration;

use pos_bridge_core::{Environment, PosProvider};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::http::RetryPolicy;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Smallest accepted request timeout.
pub const MIN_TIMEOUT_MS: u64 = 1_000;
/// Largest accepted request timeout.
pub const MAX_TIMEOUT_MS: u64 = 300_000;
/// Default transport retries.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Largest accepted transport retry count.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Base URL used for a provider and environment when none is configured.
#[must_use]
pub const fn default_base_url(provider: PosProvider, environment: Environment) -> &'static str {
    match (provider, environment) {
        (PosProvider::Square, Environment::Sandbox) => "https://connect.squareupsandbox.com",
        (PosProvider::Square, Environment::Production) => "https://connect.squareup.com",
        (PosProvider::Toast, Environment::Sandbox) => "https://ws-sandbox-api.eng.toasttab.com",
        (PosProvider::Toast, Environment::Production) => "https://ws-api.toasttab.com",
        (PosProvider::Mock, _) => "mock://pos-bridge.local",
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Failure reading configuration from the environment.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// A single violated configuration rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    /// camelCase name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ConfigViolation {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Construction-time failure. Raised before any adapter exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Every rule the configuration violates.
    #[error("Invalid POS configuration: {}", join_violations(.0))]
    Invalid(Vec<ConfigViolation>),

    /// The adapter's HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] crate::http::HttpError),
}

impl ConfigError {
    /// Violations, when this is a validation failure.
    #[must_use]
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            Self::Invalid(violations) => violations,
            Self::Client(_) => &[],
        }
    }
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Raw configuration
// =============================================================================

/// Configuration as supplied by the caller.
///
/// Provider and environment stay strings so unrecognized values can be
/// reported by validation instead of failing to parse.
#[derive(Clone, Default)]
pub struct PosConfig {
    pub provider: Option<String>,
    pub environment: Option<String>,
    pub api_key: Option<SecretString>,
    /// Vendor-specific secondary credential (Toast restaurant external id).
    pub api_secret: Option<SecretString>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub webhook_url: Option<String>,
}

impl std::fmt::Debug for PosConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosConfig")
            .field("provider", &self.provider)
            .field("environment", &self.environment)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_attempts", &self.retry_attempts)
            .field("webhook_url", &self.webhook_url)
            .finish()
    }
}

impl PosConfig {
    /// Load configuration from `POS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `EnvError` if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, EnvError> {
        Ok(Self {
            provider: get_optional_env("POS_PROVIDER"),
            environment: get_optional_env("POS_ENVIRONMENT"),
            api_key: get_optional_env("POS_API_KEY").map(SecretString::from),
            api_secret: get_optional_env("POS_API_SECRET").map(SecretString::from),
            base_url: get_optional_env("POS_BASE_URL"),
            timeout_ms: get_optional_number("POS_TIMEOUT_MS")?,
            retry_attempts: get_optional_number("POS_RETRY_ATTEMPTS")?,
            webhook_url: get_optional_env("POS_WEBHOOK_URL"),
        })
    }
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_optional_number<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .map(|raw| {
            raw.parse()
                .map_err(|e: T::Err| EnvError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

// =============================================================================
// Normalized configuration
// =============================================================================

/// Validated configuration with every default filled in.
#[derive(Clone)]
pub struct NormalizedConfig {
    pub provider: PosProvider,
    pub environment: Environment,
    pub api_key: Option<SecretString>,
    pub api_secret: Option<SecretString>,
    pub base_url: Url,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub webhook_url: Option<Url>,
}

impl std::fmt::Debug for NormalizedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedConfig")
            .field("provider", &self.provider)
            .field("environment", &self.environment)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("retry_attempts", &self.retry_attempts)
            .field("webhook_url", &self.webhook_url.as_ref().map(Url::as_str))
            .finish()
    }
}

impl NormalizedConfig {
    /// Transport retry policy for this configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_retries(self.retry_attempts)
    }
}
