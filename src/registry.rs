//! Name → routine table, assembled once at start-up and read-only afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::DiscoveryError;
use crate::scrapers::{BestBuy, Newegg, Scraper};

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<Arc<dyn Scraper>>,
}

impl RegistryBuilder {
    pub fn register<S: Scraper + 'static>(self, scraper: S) -> Self {
        self.register_shared(Arc::new(scraper))
    }

    pub fn register_shared(mut self, scraper: Arc<dyn Scraper>) -> Self {
        self.entries.push(scraper);
        self
    }

    /// Validates every name and freezes the table.
    pub fn build(self) -> Result<Registry, DiscoveryError> {
        if self.entries.is_empty() {
            return Err(DiscoveryError::Empty);
        }

        let mut scrapers = BTreeMap::new();
        for scraper in self.entries {
            let name = scraper.name();
            if !valid_name(name) {
                return Err(DiscoveryError::InvalidName(name.to_string()));
            }
            if scrapers.insert(name, scraper).is_some() {
                return Err(DiscoveryError::Duplicate(name.to_string()));
            }
        }

        Ok(Registry { scrapers })
    }
}

pub struct Registry {
    scrapers: BTreeMap<&'static str, Arc<dyn Scraper>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Every site this build ships with, at its production endpoints.
    pub fn builtin() -> Result<Self, DiscoveryError> {
        Self::builder()
            .register(BestBuy::default())
            .register(Newegg::default())
            .build()
    }

    /// Registered names in sorted order.
    pub fn list(&self) -> Vec<&'static str> {
        self.scrapers.keys().copied().collect()
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Scraper>> {
        self.scrapers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.scrapers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scrapers.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("scrapers", &self.list())
            .finish()
    }
}
