//! POS provider and deployment environment.

use serde::{Deserialize, Serialize};

use super::status::ParseEnumError;

/// The closed set of supported POS providers.
///
/// Dispatch over providers is always an exhaustive `match`, so adding a
/// variant forces every dispatch site to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosProvider {
    /// Square: catalog, orders, payments, inventory and labor.
    Square,
    /// Toast: labor and catalog, read-mostly orders.
    Toast,
    /// Synthetic in-memory provider.
    Mock,
}

impl PosProvider {
    /// All supported providers.
    pub const ALL: [Self; 3] = [Self::Square, Self::Toast, Self::Mock];

    /// Prefix used for every operational error code from this provider.
    #[must_use]
    pub const fn error_prefix(self) -> &'static str {
        match self {
            Self::Square => "SQUARE",
            Self::Toast => "TOAST",
            Self::Mock => "MOCK",
        }
    }

    /// Whether the provider talks to a real vendor API and needs credentials.
    #[must_use]
    pub const fn requires_credentials(self) -> bool {
        match self {
            Self::Square | Self::Toast => true,
            Self::Mock => false,
        }
    }

    /// Whether the provider needs a secondary secret in addition to the API key.
    ///
    /// Toast scopes every request to a restaurant via its external ID header.
    #[must_use]
    pub const fn requires_api_secret(self) -> bool {
        match self {
            Self::Toast => true,
            Self::Square | Self::Mock => false,
        }
    }
}

impl std::fmt::Display for PosProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Square => write!(f, "square"),
            Self::Toast => write!(f, "toast"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for PosProvider {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "toast" => Ok(Self::Toast),
            "mock" => Ok(Self::Mock),
            _ => Err(ParseEnumError::new("POS provider", s)),
        }
    }
}

/// Vendor environment an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(ParseEnumError::new("environment", s)),
        }
    }
}
