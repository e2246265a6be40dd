//! Operational errors and their conversion into result envelopes.
//!
//! Adapter internals return `Result<T, PosError>` and use `?` freely. Each
//! contract method converts the outcome into an [`ApiResponse`] exactly once,
//! via [`respond`], which also stamps metadata and logs failures.

use std::time::Instant;

use pos_bridge_core::{ApiError, ApiResponse, PosProvider, ResponseMetadata};
use thiserror::Error;

use crate::http::HttpError;

/// Errors raised while performing an adapter operation.
#[derive(Debug, Error)]
pub enum PosError {
    /// Vendor HTTP call failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name in `SCREAMING_SNAKE_CASE`, e.g. `ORDER`.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The provider cannot perform this operation at all.
    #[error("{operation} is not supported by {provider}")]
    NotSupported {
        /// Provider lacking the capability.
        provider: PosProvider,
        /// Operation name in `SCREAMING_SNAKE_CASE`.
        operation: &'static str,
    },

    /// Caller input failed validation before reaching the vendor.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The object changed since it was read.
    #[error("Version conflict: {0}")]
    VersionConflict(String),

    /// The operation was refused because of the entity's current state.
    #[error("{message}")]
    Rejected {
        /// Code suffix, e.g. `SHIFT_ALREADY_ACTIVE`.
        code: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// The vendor returned data that could not be mapped.
    #[error("Unexpected vendor response: {0}")]
    Mapping(String),
}

impl PosError {
    /// Construct a [`PosError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Code suffix for this error when raised by `operation`.
    #[must_use]
    pub fn code_suffix(&self, operation: &str) -> String {
        match self {
            Self::Http(http) => match http {
                HttpError::Transport { .. } => "CONNECTION_ERROR".to_string(),
                HttpError::RateLimited(_) => "RATE_LIMITED".to_string(),
                HttpError::Unauthorized(_) => "UNAUTHORIZED".to_string(),
                HttpError::NotFound(_) => "NOT_FOUND".to_string(),
                HttpError::Conflict(_) => "VERSION_CONFLICT".to_string(),
                HttpError::Decode(_) => "INVALID_RESPONSE".to_string(),
                HttpError::Status { .. }
                | HttpError::Url(_)
                | HttpError::Build(_)
                | HttpError::Header(_) => {
                    format!("{operation}_ERROR")
                }
            },
            Self::NotFound { entity, .. } => format!("{entity}_NOT_FOUND"),
            Self::NotSupported { operation, .. } => format!("{operation}_NOT_SUPPORTED"),
            Self::InvalidRequest(_) => "INVALID_REQUEST".to_string(),
            Self::VersionConflict(_) => "VERSION_CONFLICT".to_string(),
            Self::Rejected { code, .. } => (*code).to_string(),
            Self::Mapping(_) => "INVALID_RESPONSE".to_string(),
        }
    }

    /// Convert into the envelope's error record.
    #[must_use]
    pub fn to_api_error(&self, provider: PosProvider, operation: &str) -> ApiError {
        let code = format!("{}_{}", provider.error_prefix(), self.code_suffix(operation));
        let error = ApiError::new(code, self.to_string());
        match self {
            Self::Http(HttpError::Status { status, body }) => {
                error.with_details(serde_json::json!({ "status": status, "body": body }))
            }
            Self::Http(HttpError::RateLimited(retry_after)) => {
                error.with_details(serde_json::json!({ "retryAfterSeconds": retry_after }))
            }
            Self::Http(HttpError::Transport { attempts, .. }) => {
                error.with_details(serde_json::json!({ "attempts": attempts }))
            }
            Self::NotSupported { provider, operation } => error.with_details(
                serde_json::json!({ "provider": provider, "operation": operation }),
            ),
            _ => error,
        }
    }
}

/// Extension for mapping a vendor 404 to an entity-specific not-found error.
pub trait NotFoundExt<T> {
    /// Replace `HttpError::NotFound` with `PosError::NotFound { entity, id }`.
    ///
    /// # Errors
    ///
    /// Returns the original error, or the entity-specific not-found error.
    fn or_not_found(self, entity: &'static str, id: impl std::fmt::Display) -> Result<T, PosError>;
}

impl<T, E: Into<PosError>> NotFoundExt<T> for Result<T, E> {
    fn or_not_found(
        self,
        entity: &'static str,
        id: impl std::fmt::Display,
    ) -> Result<T, PosError> {
        self.map_err(|e| match e.into() {
            PosError::Http(HttpError::NotFound(_)) => PosError::not_found(entity, id),
            other => other,
        })
    }
}

/// Wrap an operation outcome in a result envelope with metadata.
pub fn respond<T>(
    provider: PosProvider,
    operation: &'static str,
    started: Instant,
    result: Result<T, PosError>,
) -> ApiResponse<T> {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let metadata = ResponseMetadata::new(provider, duration_ms);

    match result {
        Ok(data) => ApiResponse::ok(data).with_metadata(metadata),
        Err(error) => {
            let api_error = error.to_api_error(provider, operation);
            tracing::warn!(
                provider = %provider,
                operation,
                code = %api_error.code,
                error = %error,
                "POS operation failed"
            );
            ApiResponse::failure(api_error).with_metadata(metadata)
        }
    }
}

/// Failure envelope for an operation the provider cannot perform.
#[must_use]
pub fn not_supported<T>(provider: PosProvider, operation: &'static str) -> ApiResponse<T> {
    respond(
        provider,
        operation,
        Instant::now(),
        Err(PosError::NotSupported {
            provider,
            operation,
        }),
    )
}

/// Check a webhook subscription request before it reaches the vendor.
///
/// # Errors
///
/// `INVALID_REQUEST` for non-HTTP(S) URLs or an empty event list.
pub fn validate_webhook(url: &str, events: &[String]) -> Result<(), PosError> {
    let valid = url::Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"));
    if !valid {
        return Err(PosError::InvalidRequest(format!(
            "webhook url must be http or https (got '{url}')"
        )));
    }
    if events.is_empty() {
        return Err(PosError::InvalidRequest(
            "at least one event type is required".to_string(),
        ));
    }
    Ok(())
}
