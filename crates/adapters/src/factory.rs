//! Adapter construction.
//!
//! [`AdapterFactory`] is the single construction point: it validates a
//! [`PosConfig`], fills defaults and selects the adapter variant. It is an
//! ordinary value; callers create one and pass it where it is needed.

use std::time::Duration;

use chrono::Utc;
use pos_bridge_core::{Environment, PosProvider};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::adapter::Adapter;
use crate::builder::PosConfigBuilder;
use crate::config::{
    ConfigError, ConfigViolation, DEFAULT_RETRY_ATTEMPTS, DEFAULT_TIMEOUT_MS, MAX_RETRY_ATTEMPTS,
    MAX_TIMEOUT_MS, MIN_TIMEOUT_MS, NormalizedConfig, PosConfig, default_base_url,
};
use crate::mock::{MockAdapter, MockOptions};
use crate::square::SquareAdapter;
use crate::toast::ToastAdapter;

/// Validates configuration and builds adapters.
#[derive(Debug, Clone, Default)]
pub struct AdapterFactory {
    mock_options: MockOptions,
}

impl AdapterFactory {
    /// Factory with default mock behavior.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` for mock adapters created by this factory.
    #[must_use]
    pub const fn with_mock_options(mut self, options: MockOptions) -> Self {
        self.mock_options = options;
        self
    }

    /// Providers this factory can build.
    #[must_use]
    pub const fn supported_providers(&self) -> &'static [PosProvider] {
        &PosProvider::ALL
    }

    /// Base URL used when the configuration does not override it.
    #[must_use]
    pub const fn default_base_url(
        &self,
        provider: PosProvider,
        environment: Environment,
    ) -> &'static str {
        default_base_url(provider, environment)
    }

    /// Start a fluent configuration bound to this factory.
    #[must_use]
    pub fn builder(&self) -> PosConfigBuilder<'_> {
        PosConfigBuilder::new(self)
    }

    /// Check every rule and report all violations at once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing each violated rule.
    pub fn validate_config(&self, config: &PosConfig) -> Result<(), ConfigError> {
        let violations = collect_violations(config);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }

    /// Validate, then fill defaults. The input is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing each violated rule.
    pub fn normalize_config(&self, config: &PosConfig) -> Result<NormalizedConfig, ConfigError> {
        self.validate_config(config)?;

        let (Some(provider), Some(environment)) = (
            config.provider.as_deref().and_then(|p| p.parse::<PosProvider>().ok()),
            config.environment.as_deref().and_then(|e| e.parse::<Environment>().ok()),
        ) else {
            // Validation guarantees both parse.
            return Err(ConfigError::Invalid(vec![ConfigViolation::new(
                "provider",
                "provider and environment are required",
            )]));
        };

        let base_url = match &config.base_url {
            Some(raw) => parse_url(raw, "baseUrl")?,
            None => parse_url(default_base_url(provider, environment), "baseUrl")?,
        };
        let webhook_url = config
            .webhook_url
            .as_deref()
            .map(|raw| parse_url(raw, "webhookUrl"))
            .transpose()?;

        Ok(NormalizedConfig {
            provider,
            environment,
            api_key: present_secret(config.api_key.as_ref()).cloned(),
            api_secret: present_secret(config.api_secret.as_ref()).cloned(),
            base_url,
            timeout: Duration::from_millis(config.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            retry_attempts: config.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            webhook_url,
        })
    }

    /// Validate `config` and build the matching adapter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for rule violations or if the HTTP client cannot
    /// be built. Never performs network I/O.
    pub fn create_adapter(&self, config: &PosConfig) -> Result<Adapter, ConfigError> {
        let normalized = self.normalize_config(config)?;
        self.create_from_normalized(normalized)
    }

    /// Build an adapter from an already-normalized configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Client` if the HTTP client cannot be built.
    pub fn create_from_normalized(&self, config: NormalizedConfig) -> Result<Adapter, ConfigError> {
        tracing::info!(
            provider = %config.provider,
            environment = %config.environment,
            base_url = %config.base_url,
            "Creating POS adapter"
        );

        Ok(match config.provider {
            PosProvider::Square => Adapter::Square(SquareAdapter::new(config)?),
            PosProvider::Toast => Adapter::Toast(ToastAdapter::new(config)?),
            PosProvider::Mock => Adapter::Mock(MockAdapter::new(self.mock_options, Utc::now())),
        })
    }
}

fn present_secret(secret: Option<&SecretString>) -> Option<&SecretString> {
    secret.filter(|s| !s.expose_secret().trim().is_empty())
}

fn parse_url(raw: &str, field: &'static str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| {
        ConfigError::Invalid(vec![ConfigViolation::new(
            field,
            format!("{field} must be a valid URL ({e})"),
        )])
    })
}

fn collect_violations(config: &PosConfig) -> Vec<ConfigViolation> {
    let mut violations = Vec::new();

    let provider = match config.provider.as_deref() {
        None | Some("") => {
            violations.push(ConfigViolation::new("provider", "provider is required"));
            None
        }
        Some(raw) => match raw.parse::<PosProvider>() {
            Ok(provider) => Some(provider),
            Err(_) => {
                violations.push(ConfigViolation::new(
                    "provider",
                    format!("provider must be one of: square, toast, mock (got '{raw}')"),
                ));
                None
            }
        },
    };

    match config.environment.as_deref() {
        None | Some("") => {
            violations.push(ConfigViolation::new("environment", "environment is required"));
        }
        Some(raw) => {
            if raw.parse::<Environment>().is_err() {
                violations.push(ConfigViolation::new(
                    "environment",
                    format!("environment must be one of: sandbox, production (got '{raw}')"),
                ));
            }
        }
    }

    if let Some(provider) = provider {
        if provider.requires_credentials() && present_secret(config.api_key.as_ref()).is_none() {
            violations.push(ConfigViolation::new(
                "apiKey",
                format!("apiKey is required for {provider}"),
            ));
        }
        if provider.requires_api_secret() && present_secret(config.api_secret.as_ref()).is_none()
        {
            violations.push(ConfigViolation::new(
                "apiSecret",
                format!("apiSecret (restaurant external id) is required for {provider}"),
            ));
        }
    }

    if let Some(timeout) = config.timeout_ms
        && !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&timeout)
    {
        violations.push(ConfigViolation::new(
            "timeoutMs",
            format!(
                "timeoutMs must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} milliseconds (got {timeout})"
            ),
        ));
    }

    if let Some(retries) = config.retry_attempts
        && retries > MAX_RETRY_ATTEMPTS
    {
        violations.push(ConfigViolation::new(
            "retryAttempts",
            format!("retryAttempts must be between 0 and {MAX_RETRY_ATTEMPTS} (got {retries})"),
        ));
    }

    if let Some(raw) = config.base_url.as_deref()
        && Url::parse(raw).is_err()
    {
        violations.push(ConfigViolation::new(
            "baseUrl",
            format!("baseUrl must be a valid URL (got '{raw}')"),
        ));
    }

    if let Some(raw) = config.webhook_url.as_deref() {
        let valid = Url::parse(raw)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
        if !valid {
            violations.push(ConfigViolation::new(
                "webhookUrl",
                format!("webhookUrl must be a valid http or https URL (got '{raw}')"),
            ));
        }
    }

    violations
}
