// Type registry tracking every substitute and supplied instance

use crate::descriptor::{Instance, TypeKey, TypeTag};
use crate::logging::{debug, trace};
use crate::{Error, Result};
use autosub_mock::CallRecorder;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// How a registry entry came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteMode {
    /// Full substitute
    For,
    /// Partial substitute falling through to the real implementation
    ForPartsOf,
    /// Supplied by the test with `use_instance` or `use_collection`
    Manual,
}

/// A tracked dependency.
#[derive(Clone)]
pub struct SubstituteEntry {
    pub instance: Instance,
    pub mode: SubstituteMode,
    /// Present for substitutes, absent for plain supplied objects
    pub calls: Option<CallRecorder>,
}

impl SubstituteEntry {
    pub fn new(instance: Instance, mode: SubstituteMode, calls: Option<CallRecorder>) -> Self {
        Self { instance, mode, calls }
    }

    /// The entry as a single `D`
    pub fn downcast<D: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<D>> {
        self.instance.downcast_ref::<Arc<D>>().cloned()
    }

    fn accepts(&self, requested: SubstituteMode) -> bool {
        self.mode == SubstituteMode::Manual || self.mode == requested
    }
}

impl std::fmt::Debug for SubstituteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubstituteEntry")
            .field("mode", &self.mode)
            .field("substitute", &self.calls.is_some())
            .finish()
    }
}

/// Concurrent map from requested type to its tracked entry.
///
/// Entries are never mutated; `put` replaces them. Clones share the map.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    entries: Arc<RwLock<HashMap<TypeKey, Arc<SubstituteEntry>>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact lookup, falling back to the `Enumerable` key for collections
    pub fn try_get(&self, key: &TypeKey) -> Option<Arc<SubstituteEntry>> {
        let entries = self.entries.read();

        if let Some(entry) = entries.get(key) {
            trace!(key = %key, "Registry hit");
            return Some(entry.clone());
        }

        let found = key.normalized().and_then(|normalized| entries.get(&normalized).cloned());
        trace!(key = %key, found = found.is_some(), "Registry lookup with collection fallback");
        found
    }

    pub fn get_exact(&self, key: &TypeKey) -> Option<Arc<SubstituteEntry>> {
        self.entries.read().get(key).cloned()
    }

    /// Whether `key` can be satisfied by [`try_get`](Self::try_get)
    pub fn contains(&self, key: &TypeKey) -> bool {
        let entries = self.entries.read();
        entries.contains_key(key)
            || key
                .normalized()
                .is_some_and(|normalized| entries.contains_key(&normalized))
    }

    /// Return the entry for `key`, creating it with `factory` when absent.
    ///
    /// With `no_tracking` the factory result is returned without being
    /// stored. An existing entry created in a different mode is a
    /// [`Error::SubstituteConflict`]; manual entries satisfy every mode.
    pub fn get_or_create<F>(
        &self,
        key: TypeKey,
        mode: SubstituteMode,
        no_tracking: bool,
        factory: F,
    ) -> Result<Arc<SubstituteEntry>>
    where
        F: FnOnce() -> Result<SubstituteEntry>,
    {
        if no_tracking {
            trace!(key = %key, mode = ?mode, "Creating untracked entry");
            return factory().map(Arc::new);
        }

        if let Some(existing) = self.get_exact(&key) {
            return Self::check_mode(&key, existing, mode);
        }

        let created = Arc::new(factory()?);

        let mut entries = self.entries.write();
        match entries.entry(key) {
            Entry::Occupied(occupied) => {
                trace!(key = %key, "Entry inserted concurrently, discarding new one");
                Self::check_mode(&key, occupied.get().clone(), mode)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(created.clone());
                debug!(key = %key, mode = ?mode, "Registered substitute");
                Ok(created)
            }
        }
    }

    fn check_mode(
        key: &TypeKey,
        existing: Arc<SubstituteEntry>,
        requested: SubstituteMode,
    ) -> Result<Arc<SubstituteEntry>> {
        if existing.accepts(requested) {
            Ok(existing)
        } else {
            debug!(
                key = %key,
                existing = ?existing.mode,
                requested = ?requested,
                "Substitute mode conflict"
            );
            Err(Error::SubstituteConflict {
                type_name: key.name(),
            })
        }
    }

    /// Replace whatever is stored under `key` with a manual entry
    pub fn put(
        &self,
        key: TypeKey,
        instance: Instance,
        calls: Option<CallRecorder>,
    ) -> Arc<SubstituteEntry> {
        let entry = Arc::new(SubstituteEntry::new(instance, SubstituteMode::Manual, calls));

        let mut entries = self.entries.write();
        let replaced = entries.remove(&key).is_some();
        entries.insert(key, entry.clone());

        debug!(key = %key, replaced = replaced, "Stored manual instance");
        entry
    }

    /// Store a collection of `element` under its `Enumerable` key
    pub fn put_collection(&self, element: TypeTag, instance: Instance) -> Arc<SubstituteEntry> {
        let key = TypeKey::Collection {
            element,
            shape: crate::descriptor::CollectionShape::Enumerable,
        };
        self.put(key, instance, None)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn keys(&self) -> Vec<TypeKey> {
        self.entries.read().keys().copied().collect()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry").field("entries", &self.len()).finish()
    }
}
