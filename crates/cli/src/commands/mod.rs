//! Command implementations.
//!
//! Every command prints one JSON document to stdout. Envelopes that report
//! failure are still printed before the command exits non-zero.

pub mod config;
pub mod connection;
pub mod listings;
pub mod reports;

use std::io::Write;

use pos_bridge_adapters::{Adapter, AdapterFactory, ConfigError, EnvError, PosConfig};
use pos_bridge_core::{ApiResponse, PosProvider};
use serde::Serialize;
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An environment variable could not be parsed.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// The configuration violates one or more rules.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the result failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The result could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// A command-line value was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The adapter reported a failed operation.
    #[error("{code}: {message}")]
    Operation { code: String, message: String },
}

/// Environment configuration, with `provider` replacing `POS_PROVIDER` when set.
///
/// # Errors
///
/// Returns `CommandError::Env` if a numeric variable cannot be parsed.
pub fn load_config(provider: Option<PosProvider>) -> Result<PosConfig, CommandError> {
    let mut config = PosConfig::from_env()?;
    if let Some(provider) = provider {
        config.provider = Some(provider.to_string());
    }
    Ok(config)
}

/// Build the configured adapter.
///
/// # Errors
///
/// Returns `CommandError` if the configuration cannot be loaded or is invalid.
pub fn load_adapter(provider: Option<PosProvider>) -> Result<Adapter, CommandError> {
    let config = load_config(provider)?;
    tracing::debug!(?config, "Loaded POS configuration");
    Ok(AdapterFactory::new().create_adapter(&config)?)
}

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns `CommandError` if serialization or the write fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Print an envelope, then fail if it reports an error.
///
/// # Errors
///
/// Returns `CommandError::Operation` carrying the envelope's error code.
pub fn emit<T: Serialize>(response: &ApiResponse<T>) -> Result<(), CommandError> {
    print_json(response)?;
    match &response.error {
        Some(error) if !response.success => Err(CommandError::Operation {
            code: error.code.clone(),
            message: error.message.clone(),
        }),
        _ => Ok(()),
    }
}
