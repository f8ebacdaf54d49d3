//! Map-backed resolvers for preconstructed backends and pricing.
//!
//! These cover the common case where the application wires up its
//! backends at startup. Anything fancier (environment-driven
//! construction, per-tenant credentials) implements
//! [`DriverResolver`] or [`CostTableResolver`] directly.

use std::collections::HashMap;
use std::sync::Arc;
use vasari_core::CostTable;
use vasari_error::{RouterError, RouterErrorKind, VasariResult};
use vasari_interface::{ChatBackend, CostTableResolver, DriverResolver};

/// Resolves backend names from a fixed map of preconstructed handles.
#[derive(Default)]
pub struct StaticDriverResolver {
    drivers: HashMap<String, Arc<dyn ChatBackend>>,
}

impl StaticDriverResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `driver` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, driver: Arc<dyn ChatBackend>) -> &mut Self {
        self.drivers.insert(name.into(), driver);
        self
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, driver: Arc<dyn ChatBackend>) -> Self {
        self.drivers.insert(name.into(), driver);
        self
    }
}

impl DriverResolver for StaticDriverResolver {
    fn resolve(&self, name: &str) -> VasariResult<Arc<dyn ChatBackend>> {
        self.drivers.get(name).cloned().ok_or_else(|| {
            RouterError::new(RouterErrorKind::UnknownBackend(name.to_string())).into()
        })
    }
}

/// Resolves pricing from a fixed map. Backends without an entry are
/// treated as free (no cost accrues).
#[derive(Debug, Clone, Default)]
pub struct StaticCostResolver {
    tables: HashMap<String, CostTable>,
}

impl StaticCostResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers pricing for `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, table: CostTable) -> &mut Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, table: CostTable) -> Self {
        self.tables.insert(name.into(), table);
        self
    }
}

impl CostTableResolver for StaticCostResolver {
    fn resolve(&self, name: &str) -> Option<CostTable> {
        self.tables.get(name).cloned()
    }
}
