//! Ordered generator registry.

use crate::generators::{default_generators, GeneratorEntry};
use crate::hierarchy::Placement;
use parking_lot::RwLock;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Ordered list of generators, at most one per concrete generator type.
///
/// Order is significant: the picker returns the first entry able to produce a type.
/// Readers receive an immutable snapshot, so a generation in progress never observes a
/// concurrent registration.
pub struct GeneratorStorage {
    generators: RwLock<Arc<Vec<GeneratorEntry>>>,
}

impl Default for GeneratorStorage {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl GeneratorStorage {
    /// Empty registry.
    pub fn new() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Registry pre-filled with the default generators.
    pub fn with_defaults() -> Self {
        Self::from_entries(default_generators())
    }

    pub fn from_entries(entries: Vec<GeneratorEntry>) -> Self {
        Self {
            generators: RwLock::new(Arc::new(entries)),
        }
    }

    /// Append a generator.
    pub fn add(&self, entry: GeneratorEntry) -> bool {
        self.insert(entry, Placement::Last)
    }

    /// Insert a generator right before the entry of type `Target`.
    pub fn add_before<Target: 'static>(&self, entry: GeneratorEntry) -> bool {
        self.insert(entry, Placement::Before(TypeId::of::<Target>()))
    }

    /// Insert a generator right after the entry of type `Target`.
    pub fn add_after<Target: 'static>(&self, entry: GeneratorEntry) -> bool {
        self.insert(entry, Placement::After(TypeId::of::<Target>()))
    }

    /// Snapshot of the registered generators in order.
    pub fn get_all(&self) -> Arc<Vec<GeneratorEntry>> {
        self.generators.read().clone()
    }

    pub fn len(&self) -> usize {
        self.generators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `false` when a generator of the same type is already registered.
    fn insert(&self, entry: GeneratorEntry, placement: Placement) -> bool {
        let mut guard = self.generators.write();
        if guard.iter().any(|existing| existing.type_id() == entry.type_id()) {
            info!(
                "Received generator {} is already present so its copy will not be added",
                entry.type_name()
            );
            return false;
        }

        let mut entries = (**guard).clone();
        let target_index = |target: TypeId| entries.iter().position(|e| e.type_id() == target);
        let index = match placement {
            Placement::Last => None,
            Placement::Before(target) => target_index(target),
            Placement::After(target) => target_index(target).map(|index| index + 1),
        };
        let index = index.unwrap_or_else(|| {
            if placement != Placement::Last {
                info!(
                    "Target generator is not present, adding {} to list end",
                    entry.type_name()
                );
            }
            entries.len()
        });
        entries.insert(index, entry);
        *guard = Arc::new(entries);
        true
    }
}

impl fmt::Debug for GeneratorStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorStorage")
            .field("generators", &*self.generators.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{
        BooleanGenerator, EnumGenerator, IntegerGenerator, PojoGenerator, StringGenerator,
    };

    fn names(storage: &GeneratorStorage) -> Vec<&'static str> {
        storage
            .get_all()
            .iter()
            .map(|entry| entry.type_name().rsplit("::").next().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_with_defaults() {
        let storage = GeneratorStorage::with_defaults();
        assert_eq!(storage.len(), 15);
        assert!(storage.get_all()[0].is::<StringGenerator>());
        assert!(storage.get_all()[14].is::<PojoGenerator>());
    }

    #[test]
    fn test_add_deduplicates() {
        let storage = GeneratorStorage::new();
        assert!(storage.add(GeneratorEntry::simple(StringGenerator)));
        assert!(!storage.add(GeneratorEntry::simple(StringGenerator)));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_add_before_and_after() {
        let storage = GeneratorStorage::new();
        storage.add(GeneratorEntry::simple(StringGenerator));
        storage.add(GeneratorEntry::parameterized(PojoGenerator));
        storage.add_before::<PojoGenerator>(GeneratorEntry::parameterized(EnumGenerator));
        storage.add_after::<StringGenerator>(GeneratorEntry::simple(IntegerGenerator));

        assert_eq!(
            names(&storage),
            vec!["StringGenerator", "IntegerGenerator", "EnumGenerator", "PojoGenerator"]
        );
    }

    #[test]
    fn test_missing_target_appends() {
        let storage = GeneratorStorage::new();
        storage.add(GeneratorEntry::simple(StringGenerator));
        storage.add_before::<PojoGenerator>(GeneratorEntry::simple(BooleanGenerator));

        assert_eq!(names(&storage), vec!["StringGenerator", "BooleanGenerator"]);
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let storage = GeneratorStorage::new();
        let before = storage.get_all();
        storage.add(GeneratorEntry::simple(StringGenerator));
        assert!(before.is_empty());
        assert_eq!(storage.len(), 1);
    }
}
