//! Name-keyed store of shared objects
//!
//! Lookups take a read lock and may run concurrently. Registration takes the write lock for
//! both the duplicate check and the insert, so racing registrations of one name yield exactly
//! one success.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use regex::Regex;

use super::errors::{RegistryError, RegistryResult};
use crate::config::EngineConfig;
use crate::observability::{log_event_with_fields, Event};

/// Dotted namespace such as `cq.getChildren`
pub const DEFAULT_NAME_PATTERN: &str = r"[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+";

/// Registry of named objects, typically query factories
pub struct NamedRegistry<F: ?Sized> {
    pattern: Option<Regex>,
    entries: RwLock<HashMap<String, Arc<F>>>,
}

impl<F: ?Sized> NamedRegistry<F> {
    /// Creates a registry whose names must match `pattern` in full
    pub fn new(pattern: &str) -> RegistryResult<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|e| RegistryError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: Some(regex),
            entries: RwLock::new(HashMap::new()),
        })
    }

    /// Creates a registry accepting any non-empty name
    pub fn unrestricted() -> Self {
        Self {
            pattern: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry using the configured naming pattern
    pub fn from_config(config: &EngineConfig) -> RegistryResult<Self> {
        Self::new(&config.name_pattern)
    }

    /// Returns true if `name` is acceptable to this registry
    pub fn is_valid_name(&self, name: &str) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(name),
            None => !name.is_empty(),
        }
    }

    /// Registers `object` under `name`.
    ///
    /// Re-registering the same instance under the same name succeeds without change. A
    /// different instance under a taken name fails with `DuplicateName` and the first
    /// registration stays in place.
    pub fn register(&self, name: impl Into<String>, object: Arc<F>) -> RegistryResult<()> {
        let name = name.into();

        if !self.is_valid_name(&name) {
            log_event_with_fields(
                Event::FactoryRejected,
                &[("name", name.as_str()), ("reason", "invalid name")],
            );
            return Err(RegistryError::InvalidName {
                pattern: self.pattern_str().to_string(),
                name,
            });
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RegistryError::Internal("Lock poisoned".into()))?;

        if let Some(existing) = entries.get(&name) {
            if Arc::ptr_eq(existing, &object) {
                return Ok(());
            }
            log_event_with_fields(
                Event::FactoryRejected,
                &[("name", name.as_str()), ("reason", "duplicate name")],
            );
            return Err(RegistryError::DuplicateName(name));
        }

        log_event_with_fields(Event::FactoryRegistered, &[("name", name.as_str())]);
        entries.insert(name, object);
        Ok(())
    }

    /// Returns the object registered under `name`
    pub fn lookup(&self, name: &str) -> Option<Arc<F>> {
        self.read_entries().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read_entries().contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_entries().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panic while holding the write lock never leaves a partial insert, so readers keep
    /// using the map after poisoning.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<F>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn pattern_str(&self) -> &str {
        self.pattern.as_ref().map(Regex::as_str).unwrap_or(".+")
    }
}

impl<F: ?Sized> fmt::Debug for NamedRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedRegistry")
            .field("pattern", &self.pattern_str())
            .field("names", &self.names())
            .finish()
    }
}
