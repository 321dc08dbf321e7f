//! Hot-swappable protocol registry.
//!
//! # Swap protocol
//!
//! A [`Registry`] publishes one immutable [`ProtocolMap`] at a time behind a
//! read/write lock. Loads decode the new mapping completely *before* taking
//! the write lock, so a malformed file never disturbs the published one, and
//! the write lock is held only for the pointer swap.
//!
//! Lookups take the read lock just long enough to clone the stored record,
//! then derive IP-version and ASN fields outside the lock.
//!
//! The registry is an ordinary value: share it as `Arc<Registry>` with every
//! component that reads or reloads it.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{io_err, RegistryError};
use crate::inference;
use crate::types::{decode_map, Protocol, ProtocolMap};

#[derive(Debug, Default)]
struct Published {
    protocols: Option<Arc<ProtocolMap>>,
    generation: u64,
}

/// Concurrent lookup table of protocol records, replaced wholesale on load.
#[derive(Debug, Default)]
pub struct Registry {
    published: RwLock<Published>,
}

impl Registry {
    /// An empty registry; every lookup synthesizes a default record until
    /// the first successful load.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Decode `bytes` and publish the result, returning the new generation.
    ///
    /// On [`RegistryError::Decode`] the published mapping is untouched.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<u64, RegistryError> {
        let protocols = decode_map(bytes)?;
        Ok(self.publish(protocols))
    }

    /// Read the protocols file at `path` and publish its contents.
    ///
    /// Returns `RegistryError::Io` if the file cannot be read and
    /// `RegistryError::Parse` (with path) if it is malformed.
    pub fn load_file(&self, path: &Path) -> Result<u64, RegistryError> {
        let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
        let protocols = decode_map(&bytes).map_err(|e| RegistryError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(self.publish(protocols))
    }

    fn publish(&self, protocols: ProtocolMap) -> u64 {
        let protocols = Arc::new(protocols);
        let mut guard = self.write();
        guard.protocols = Some(protocols);
        guard.generation += 1;
        guard.generation
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Resolve `identifier` to a record. Never fails.
    ///
    /// Unknown identifiers resolve to [`Protocol::unknown`]; both known and
    /// unknown records then get IP-version and ASN fields derived from the
    /// identifier (see [`inference::apply`]).
    pub fn get(&self, identifier: &str) -> Protocol {
        let stored = {
            let guard = self.read();
            guard
                .protocols
                .as_ref()
                .and_then(|protocols| protocols.get(identifier))
                .cloned()
        };
        let base = stored.unwrap_or_else(|| Protocol::unknown(identifier));
        inference::apply(identifier, base)
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Number of successful loads so far; `0` before the first one.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    pub fn is_loaded(&self) -> bool {
        self.read().protocols.is_some()
    }

    pub fn len(&self) -> usize {
        self.read().protocols.as_ref().map_or(0, |p| p.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The currently published mapping (stored records, nothing derived).
    pub fn snapshot(&self) -> Arc<ProtocolMap> {
        self.read().protocols.clone().unwrap_or_default()
    }

    /// Known identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.snapshot().keys().cloned().collect();
        ids.sort();
        ids
    }

    // The guarded value is only ever replaced whole, so a poisoned lock still
    // holds a complete mapping.
    fn read(&self) -> RwLockReadGuard<'_, Published> {
        self.published.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Published> {
        self.published.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_is_unloaded() {
        let registry = Registry::new();
        assert!(!registry.is_loaded());
        assert_eq!(registry.generation(), 0);
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn generation_counts_successful_loads_only() {
        let registry = Registry::new();
        assert_eq!(registry.load_bytes(b"{}").expect("load"), 1);
        registry.load_bytes(b"{oops").unwrap_err();
        assert_eq!(registry.load_bytes(br#"{"a": {}}"#).expect("load"), 2);
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn returned_record_is_a_copy() {
        let registry = Registry::new();
        registry
            .load_bytes(br#"{"k": {"Name": "Link", "Tags": ["core"]}}"#)
            .expect("load");
        let mut record = registry.get("k");
        record.name.push_str(" mutated");
        record.tags.clear();
        assert_eq!(registry.get("k").name, "Link");
        assert_eq!(registry.snapshot()["k"].tags, vec!["core".to_string()]);
    }
}
