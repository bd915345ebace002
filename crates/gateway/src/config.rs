//! Gateway configuration
//!
//! A [`GatewayConfig`] lists the venues to connect. Each [`VenueConfig`] names
//! an adapter in the [`VenueCatalog`](crate::catalog::VenueCatalog) and carries
//! credentials plus free-form options interpreted by that adapter.

use mercury_core::{OFF_CHAIN_LEDGER, VenueId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Venues to connect
    #[serde(default)]
    pub venues: Vec<VenueConfig>,
}

impl GatewayConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_venue(mut self, venue: VenueConfig) -> Self {
        self.venues.push(venue);
        self
    }
}

/// Venue descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Catalog name of the adapter
    pub name: String,
    /// Defaults to `name`
    #[serde(default)]
    pub exchange_id: Option<String>,
    /// Defaults to the off-chain sentinel
    #[serde(default)]
    pub ledger_id: Option<String>,
    #[serde(default)]
    pub credentials: Credentials,
    /// Adapter-specific options
    #[serde(default)]
    pub options: serde_json::Value,
}

impl VenueConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exchange_id: None,
            ledger_id: None,
            credentials: Credentials::default(),
            options: serde_json::Value::Null,
        }
    }

    pub fn with_exchange_id(mut self, exchange_id: impl Into<String>) -> Self {
        self.exchange_id = Some(exchange_id.into());
        self
    }

    pub fn with_ledger(mut self, ledger_id: impl Into<String>) -> Self {
        self.ledger_id = Some(ledger_id.into());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = options;
        self
    }

    /// Identity the configured adapter is registered under
    pub fn venue_id(&self) -> VenueId {
        VenueId::new(
            self.ledger_id.as_deref().unwrap_or(OFF_CHAIN_LEDGER),
            self.exchange_id.as_deref().unwrap_or(&self.name),
        )
    }

    /// Decode the adapter options, falling back to defaults when absent
    pub fn options<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        if self.options.is_null() {
            return Ok(T::default());
        }
        serde_json::from_value(self.options.clone()).map_err(|e| ConfigError::InvalidOptions {
            venue: self.venue_id().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Venue credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    /// Wallet address for on-chain venues
    #[serde(default)]
    pub address: Option<String>,
}

impl Credentials {
    pub fn api(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    pub fn wallet(private_key: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            private_key: Some(private_key.into()),
            address: Some(address.into()),
            ..Self::default()
        }
    }

    pub fn require_private_key(&self, venue: &VenueId) -> Result<&str, ConfigError> {
        require(&self.private_key, venue, "private_key")
    }
}

fn require<'a>(
    value: &'a Option<String>,
    venue: &VenueId,
    field: &'static str,
) -> Result<&'a str, ConfigError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingCredentials {
            venue: venue.to_string(),
            field,
        }),
    }
}

// Secrets never reach the logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "***")
        }
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("secret", &redact(&self.secret))
            .field("private_key", &redact(&self.private_key))
            .field("address", &self.address)
            .finish()
    }
}
