//! Venue identity -> adapter map

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use mercury_core::VenueId;
use mercury_ports::ExchangeAdapter;

use crate::catalog::VenueCatalog;
use crate::config::GatewayConfig;
use crate::error::ConfigError;

/// Adapters of one connection
///
/// Built once at connect time and read-only afterwards.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<VenueId, Arc<dyn ExchangeAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured venue through the catalog
    pub fn build(config: &GatewayConfig, catalog: &VenueCatalog) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for venue in &config.venues {
            let adapter = catalog.build(venue)?;
            registry.insert(adapter)?;
        }
        Ok(registry)
    }

    /// Register an adapter under its own venue identity
    pub fn insert(&mut self, adapter: Arc<dyn ExchangeAdapter>) -> Result<(), ConfigError> {
        let venue = adapter.venue().clone();
        if self.adapters.contains_key(&venue) {
            return Err(ConfigError::DuplicateVenue(venue));
        }
        info!("Registered adapter for {}", venue);
        self.adapters.insert(venue, adapter);
        Ok(())
    }

    pub fn get(&self, venue: &VenueId) -> Option<Arc<dyn ExchangeAdapter>> {
        self.adapters.get(venue).cloned()
    }

    /// Registered venues, sorted
    pub fn venues(&self) -> Vec<VenueId> {
        let mut venues: Vec<VenueId> = self.adapters.keys().cloned().collect();
        venues.sort();
        venues
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Close every adapter, logging failures
    pub async fn close_all(&self) {
        for (venue, adapter) in &self.adapters {
            match adapter.close().await {
                Ok(()) => info!("Closed adapter for {}", venue),
                Err(e) => warn!("Failed to close adapter for {}: {}", venue, e),
            }
        }
    }
}
