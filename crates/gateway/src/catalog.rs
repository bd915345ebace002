//! Venue name -> adapter constructor table

use std::collections::HashMap;
use std::sync::Arc;

use mercury_ports::ExchangeAdapter;

use crate::adapters::paper::{PaperExchange, PaperSwap};
use crate::config::VenueConfig;
use crate::error::ConfigError;

/// Adapter constructor
pub type VenueFactory =
    Box<dyn Fn(&VenueConfig) -> Result<Arc<dyn ExchangeAdapter>, ConfigError> + Send + Sync>;

/// Adapters `connect` can build, by name
pub struct VenueCatalog {
    factories: HashMap<String, VenueFactory>,
}

impl VenueCatalog {
    /// Catalog with no venues
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Catalog with the in-memory `paper` and `paper_swap` venues
    pub fn with_paper_venues() -> Self {
        Self::empty()
            .with_venue(PaperExchange::NAME, |config: &VenueConfig| {
                Ok(Arc::new(PaperExchange::from_config(config)?) as Arc<dyn ExchangeAdapter>)
            })
            .with_venue(PaperSwap::NAME, |config: &VenueConfig| {
                Ok(Arc::new(PaperSwap::from_config(config)?) as Arc<dyn ExchangeAdapter>)
            })
    }

    /// Register a constructor, replacing any previous one under the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&VenueConfig) -> Result<Arc<dyn ExchangeAdapter>, ConfigError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn with_venue<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&VenueConfig) -> Result<Arc<dyn ExchangeAdapter>, ConfigError> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Build the adapter a venue descriptor names
    pub fn build(&self, config: &VenueConfig) -> Result<Arc<dyn ExchangeAdapter>, ConfigError> {
        let factory = self
            .factories
            .get(&config.name)
            .ok_or_else(|| ConfigError::UnknownExchange(config.name.clone()))?;
        factory(config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Known venue names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for VenueCatalog {
    fn default() -> Self {
        Self::with_paper_venues()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_venues_are_registered() {
        let catalog = VenueCatalog::default();
        assert_eq!(catalog.names(), vec!["paper", "paper_swap"]);
    }

    #[test]
    fn test_unknown_exchange() {
        let catalog = VenueCatalog::default();
        let err = catalog.build(&VenueConfig::new("nasdaq")).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownExchange(name) if name == "nasdaq"));
    }

    #[test]
    fn test_build_uses_configured_identity() {
        let catalog = VenueCatalog::default();
        let adapter = catalog
            .build(&VenueConfig::new("paper").with_exchange_id("paper_a"))
            .unwrap();
        assert_eq!(adapter.venue().exchange_id, "paper_a");
        assert!(adapter.venue().is_off_chain());
    }
}
