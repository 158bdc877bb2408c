//! Provider-to-driver lookup table

use std::collections::HashMap;
use std::sync::Arc;

use super::Driver;
use crate::kind::ProviderId;

/// Table of drivers keyed by provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    drivers: HashMap<ProviderId, Arc<dyn Driver>>,
}

impl ProviderRegistry {
    /// Registry with no drivers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every driver compiled into this build.
    #[must_use]
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();

        #[cfg(feature = "sqlserver")]
        registry.register(Arc::new(super::sqlserver::SqlServerDriver));

        #[cfg(feature = "mysql")]
        registry.register(Arc::new(super::mysql::MySqlDriver));

        registry
    }

    /// Register `driver` for its provider, replacing any previous one.
    pub fn register(&mut self, driver: Arc<dyn Driver>) -> Option<Arc<dyn Driver>> {
        let provider = driver.provider();
        tracing::debug!(provider = %provider, "Registering driver");
        self.drivers.insert(provider, driver)
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with_driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.register(driver);
        self
    }

    #[must_use]
    pub fn driver(&self, provider: ProviderId) -> Option<Arc<dyn Driver>> {
        self.drivers.get(&provider).map(Arc::clone)
    }

    #[must_use]
    pub fn contains(&self, provider: ProviderId) -> bool {
        self.drivers.contains_key(&provider)
    }
}
