//! Lazy, thread-safe registries for backend handles and cost tables.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use vasari_core::CostTable;
use vasari_interface::{ChatBackend, CostTableResolver, DriverResolver};
use vasari_error::VasariResult;

/// Caches backend handles by name, constructing each at most once.
///
/// The lock is held across resolution, which guarantees a single
/// construction per name under concurrent first access. Resolution is
/// expected to be cheap (client construction, not network I/O).
/// Entries are never evicted.
pub struct DriverRegistry {
    resolver: Arc<dyn DriverResolver>,
    cache: Mutex<HashMap<String, Arc<dyn ChatBackend>>>,
}

impl DriverRegistry {
    /// Creates a registry backed by the given resolver.
    pub fn new(resolver: Arc<dyn DriverResolver>) -> Self {
        Self {
            resolver,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `name` to a cached backend handle.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's failure; failed resolutions are not
    /// cached, so a later call may succeed.
    pub fn get(&self, name: &str) -> VasariResult<Arc<dyn ChatBackend>> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(driver) = cache.get(name) {
            return Ok(driver.clone());
        }
        debug!(backend = %name, "Constructing backend handle");
        let driver = self.resolver.resolve(name)?;
        cache.insert(name.to_string(), driver.clone());
        Ok(driver)
    }
}

/// Caches pricing tables by name with the same discipline as
/// [`DriverRegistry`]. Absence is cached too: a backend without pricing
/// is not re-resolved on every request.
pub struct CostRegistry {
    resolver: Arc<dyn CostTableResolver>,
    cache: Mutex<HashMap<String, Option<CostTable>>>,
}

impl CostRegistry {
    /// Creates a registry backed by the given resolver.
    pub fn new(resolver: Arc<dyn CostTableResolver>) -> Self {
        Self {
            resolver,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `name` to its pricing table, if one is configured.
    pub fn get(&self, name: &str) -> Option<CostTable> {
        let mut cache = self.cache.lock().unwrap();
        cache
            .entry(name.to_string())
            .or_insert_with(|| self.resolver.resolve(name))
            .clone()
    }
}
