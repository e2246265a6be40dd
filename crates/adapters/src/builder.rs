//! Fluent configuration assembly.

use pos_bridge_core::{Environment, PosProvider};
use secrecy::SecretString;

use crate::adapter::Adapter;
use crate::config::{ConfigError, NormalizedConfig, PosConfig};
use crate::factory::AdapterFactory;

/// Transport overrides for [`PosConfigBuilder::connection_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub retry_attempts: Option<u32>,
}

/// Accumulates a [`PosConfig`] and hands it to the factory.
///
/// ```ignore
/// let adapter = AdapterFactory::new()
///     .builder()
///     .provider(PosProvider::Square)
///     .environment(Environment::Sandbox)
///     .credentials("EAAA...", None)
///     .create_adapter()?;
/// ```
#[derive(Debug, Clone)]
pub struct PosConfigBuilder<'a> {
    factory: &'a AdapterFactory,
    config: PosConfig,
}

impl<'a> PosConfigBuilder<'a> {
    pub(crate) fn new(factory: &'a AdapterFactory) -> Self {
        Self {
            factory,
            config: PosConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: PosProvider) -> Self {
        self.config.provider = Some(provider.to_string());
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = Some(environment.to_string());
        self
    }

    /// API key, plus the vendor's secondary credential where it needs one.
    #[must_use]
    pub fn credentials(mut self, api_key: impl Into<String>, api_secret: Option<&str>) -> Self {
        self.config.api_key = Some(SecretString::from(api_key.into()));
        self.config.api_secret = api_secret.map(|s| SecretString::from(s.to_string()));
        self
    }

    /// Override base URL, timeout or retry count. Unset fields keep their
    /// previous value.
    #[must_use]
    pub fn connection_options(mut self, options: ConnectionOptions) -> Self {
        if options.base_url.is_some() {
            self.config.base_url = options.base_url;
        }
        if options.timeout_ms.is_some() {
            self.config.timeout_ms = options.timeout_ms;
        }
        if options.retry_attempts.is_some() {
            self.config.retry_attempts = options.retry_attempts;
        }
        self
    }

    #[must_use]
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook_url = Some(url.into());
        self
    }

    /// The configuration accumulated so far.
    #[must_use]
    pub const fn config(&self) -> &PosConfig {
        &self.config
    }

    /// Validate and normalize through the factory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing each violated rule.
    pub fn build(&self) -> Result<NormalizedConfig, ConfigError> {
        self.factory.normalize_config(&self.config)
    }

    /// Validate and construct the adapter through the factory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for rule violations or client construction
    /// failures.
    pub fn create_adapter(&self) -> Result<Adapter, ConfigError> {
        self.factory.create_adapter(&self.config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::adapter::PosAdapter;
    use crate::mock::MockOptions;

    #[test]
    fn test_builder_delegates_validation() {
        let factory = AdapterFactory::new();
        let err = factory
            .builder()
            .provider(PosProvider::Toast)
            .environment(Environment::Sandbox)
            .connection_options(ConnectionOptions {
                timeout_ms: Some(999_999),
                ..ConnectionOptions::default()
            })
            .build()
            .unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["apiKey", "apiSecret", "timeoutMs"]);
    }

    #[test]
    fn test_builder_builds_normalized_config() {
        let factory = AdapterFactory::new();
        let config = factory
            .builder()
            .provider(PosProvider::Toast)
            .environment(Environment::Production)
            .credentials("token", Some("restaurant-guid"))
            .connection_options(ConnectionOptions {
                timeout_ms: Some(10_000),
                retry_attempts: Some(1),
                ..ConnectionOptions::default()
            })
            .webhook_url("https://hooks.example.com/toast")
            .build()
            .unwrap();

        assert_eq!(config.provider, PosProvider::Toast);
        assert_eq!(config.base_url.as_str(), "https://ws-api.toasttab.com/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(
            config.api_secret.unwrap().expose_secret(),
            "restaurant-guid"
        );
    }

    #[test]
    fn test_connection_options_merge() {
        let factory = AdapterFactory::new();
        let builder = factory
            .builder()
            .connection_options(ConnectionOptions {
                timeout_ms: Some(5_000),
                ..ConnectionOptions::default()
            })
            .connection_options(ConnectionOptions {
                retry_attempts: Some(2),
                ..ConnectionOptions::default()
            });
        assert_eq!(builder.config().timeout_ms, Some(5_000));
        assert_eq!(builder.config().retry_attempts, Some(2));
    }

    #[test]
    fn test_builder_creates_mock_adapter() {
        let factory = AdapterFactory::new().with_mock_options(MockOptions::instant());
        let adapter = factory
            .builder()
            .provider(PosProvider::Mock)
            .environment(Environment::Sandbox)
            .create_adapter()
            .unwrap();
        assert_eq!(adapter.provider(), PosProvider::Mock);
    }
}
