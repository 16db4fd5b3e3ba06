//! Named dialect registry.
//!
//! A registry is an ordinary value built during startup: each backend
//! crate exposes a `register` function that adds its dialect. Once built,
//! the registry can be installed process-wide exactly once and is
//! read-only from then on.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::dialect::Dialect;
use crate::error::{DialectError, Result};

static GLOBAL: OnceLock<DialectRegistry> = OnceLock::new();

/// Maps dialect names to shared dialect instances.
#[derive(Default, Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dialect under `name`. A later registration replaces an
    /// earlier one with the same name.
    pub fn register<D: Dialect + 'static>(&mut self, name: impl Into<String>, dialect: D) {
        let name = name.into();
        info!(name = %name, dialect = dialect.name(), "registering dialect");
        if self.dialects.insert(name.clone(), Arc::new(dialect)).is_some() {
            warn!(name = %name, "dialect registration replaced an earlier one");
        }
    }

    /// Returns the dialect registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(name).cloned()
    }

    /// Returns the dialect registered under `name`, or an error.
    pub fn require(&self, name: &str) -> Result<Arc<dyn Dialect>> {
        self.get(name)
            .ok_or_else(|| DialectError::UnknownDialect(name.to_string()))
    }

    /// Returns whether a dialect is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered dialects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    /// Returns whether no dialect is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }

    /// Installs this registry as the process-wide registry.
    ///
    /// Succeeds once per process.
    pub fn install(self) -> Result<&'static Self> {
        GLOBAL
            .set(self)
            .map_err(|_| DialectError::RegistryAlreadyInstalled)?;
        global().ok_or(DialectError::RegistryAlreadyInstalled)
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.names())
            .finish()
    }
}

/// Returns the process-wide registry, if one was installed.
#[must_use]
pub fn global() -> Option<&'static DialectRegistry> {
    GLOBAL.get()
}

/// Looks a dialect up in the process-wide registry.
pub fn lookup(name: &str) -> Result<Arc<dyn Dialect>> {
    global()
        .ok_or_else(|| DialectError::UnknownDialect(name.to_string()))?
        .require(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::BaseDialect;

    struct Shouty;

    impl Dialect for Shouty {
        fn name(&self) -> &'static str {
            "shouty"
        }

        fn keyword_auto_increment(&self) -> &'static str {
            "AUTO_INCREMENT"
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = DialectRegistry::new();
        assert!(registry.is_empty());
        registry.register("base", BaseDialect::new());
        registry.register("shouty", Shouty);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["base", "shouty"]);
        assert!(registry.contains("base"));
        assert_eq!(registry.get("shouty").map(|d| d.name()), Some("shouty"));
        assert!(registry.get("oracle").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = DialectRegistry::new();
        registry.register("main", BaseDialect::new());
        registry.register("main", Shouty);

        assert_eq!(registry.len(), 1);
        let dialect = registry.require("main").unwrap();
        assert_eq!(dialect.keyword_auto_increment(), "AUTO_INCREMENT");
    }

    #[test]
    fn test_require_unknown() {
        let registry = DialectRegistry::new();
        let err = registry.require("oracle").err().unwrap();
        assert!(matches!(err, DialectError::UnknownDialect(ref n) if n == "oracle"));
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = DialectRegistry::new();
        registry.register("base", BaseDialect::new());
        assert_eq!(
            format!("{registry:?}"),
            "DialectRegistry { dialects: [\"base\"] }"
        );
    }
}
