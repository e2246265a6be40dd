//! Configuration validation.
//!
//! Runs the factory's rules against the environment without building an
//! adapter or contacting the vendor.

use pos_bridge_adapters::AdapterFactory;
use pos_bridge_core::PosProvider;
use serde::Serialize;

use super::{CommandError, load_config, print_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_attempts: Option<u32>,
    has_credentials: bool,
    violations: Vec<Violation>,
}

#[derive(Debug, Serialize)]
struct Violation {
    field: &'static str,
    message: String,
}

/// Validate the environment configuration and print a report.
///
/// # Errors
///
/// Returns `CommandError::Config` when any rule is violated, after printing
/// the report.
pub fn validate(provider: Option<PosProvider>) -> Result<(), CommandError> {
    let config = load_config(provider)?;
    let factory = AdapterFactory::new();

    match factory.normalize_config(&config) {
        Ok(normalized) => {
            tracing::info!(provider = %normalized.provider, "Configuration is valid");
            print_json(&ConfigReport {
                valid: true,
                provider: Some(normalized.provider.to_string()),
                environment: Some(normalized.environment.to_string()),
                base_url: Some(normalized.base_url.to_string()),
                timeout_ms: Some(normalized.timeout.as_millis()),
                retry_attempts: Some(normalized.retry_attempts),
                has_credentials: normalized.api_key.is_some(),
                violations: Vec::new(),
            })
        }
        Err(error) => {
            print_json(&ConfigReport {
                valid: false,
                provider: config.provider.clone(),
                environment: config.environment.clone(),
                base_url: config.base_url.clone(),
                timeout_ms: config.timeout_ms.map(u128::from),
                retry_attempts: config.retry_attempts,
                has_credentials: config.api_key.is_some(),
                violations: error
                    .violations()
                    .iter()
                    .map(|v| Violation {
                        field: v.field,
                        message: v.message.clone(),
                    })
                    .collect(),
            })?;
            Err(error.into())
        }
    }
}
