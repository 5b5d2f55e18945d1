//! Name-to-dialect registry.

use super::{CommonDialect, Dialect, PostgresDialect};
use std::collections::HashMap;
use std::sync::Arc;

/// Explicit name → dialect registry.
///
/// Built once at startup and handed to whatever opens connections. Lookups
/// after population are read-only, so sharing the registry (or the `Arc`ed
/// dialects it returns) across tasks needs no locking.
#[derive(Clone, Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in dialects.
    ///
    /// `postgres` and `cloudsqlpostgres` share one instance.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let postgres: Arc<dyn Dialect> = Arc::new(PostgresDialect::new());
        registry.register("postgres", Arc::clone(&postgres));
        registry.register("cloudsqlpostgres", postgres);
        registry.register("common", Arc::new(CommonDialect::new()));
        registry
    }

    /// Register `dialect` under `name`.
    ///
    /// Registering the same name again silently replaces the earlier entry;
    /// the last registration wins.
    pub fn register(&mut self, name: impl Into<String>, dialect: Arc<dyn Dialect>) {
        let name = name.into();
        if self.dialects.insert(name.clone(), dialect).is_some() {
            tracing::warn!(dialect = %name, "dialect re-registered, previous instance replaced");
        } else {
            tracing::debug!(dialect = %name, "dialect registered");
        }
    }

    /// Look up a dialect by name, as done when a connection is opened.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.names())
            .finish()
    }
}
