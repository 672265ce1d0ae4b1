//! Custom field mappings.
//!
//! A mapping replaces registry lookup for one exact field. Its producer is authoritative:
//! values it returns are assigned as they are, without provenance tagging.

use crate::config::GenerationConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use type_meta::{FieldDef, TypeName, Value};

/// Producer of a field value.
pub type FieldMappingFn = Arc<dyn Fn(&GenerationConfig) -> Value + Send + Sync>;

/// Mapping table snapshot.
pub type FieldMappings = HashMap<FieldKey, FieldMappingFn>;

/// Identity of a declared field: its declaring class and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub owner: TypeName,
    pub field: String,
}

impl FieldKey {
    pub fn new(owner: impl Into<TypeName>, field: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
        }
    }

    pub fn of(field: &FieldDef) -> Self {
        Self::new(field.declaring.clone(), field.name.clone())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.field)
    }
}

/// Per-field overrides, at most one per field.
#[derive(Default)]
pub struct CustomFieldMappingStorage {
    mappings: RwLock<Arc<FieldMappings>>,
}

impl CustomFieldMappingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the producer for a field.
    pub fn add_mapping<F>(&self, field: FieldKey, producer: F)
    where
        F: Fn(&GenerationConfig) -> Value + Send + Sync + 'static,
    {
        info!("Adding custom mapping for field '{}'", field);
        let mut guard = self.mappings.write();
        let mut mappings = FieldMappings::clone(&guard);
        mappings.insert(field, Arc::new(producer));
        *guard = Arc::new(mappings);
    }

    pub fn get_mapping(&self, field: &FieldKey) -> Option<FieldMappingFn> {
        self.mappings.read().get(field).cloned()
    }

    pub fn has_mapping(&self, field: &FieldKey) -> bool {
        self.mappings.read().contains_key(field)
    }

    /// Current mappings; later registrations do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<FieldMappings> {
        self.mappings.read().clone()
    }
}

impl fmt::Debug for CustomFieldMappingStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.mappings.read();
        let mut fields: Vec<String> = guard.keys().map(FieldKey::to_string).collect();
        fields.sort();
        f.debug_struct("CustomFieldMappingStorage")
            .field("fields", &fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let storage = CustomFieldMappingStorage::new();
        let key = FieldKey::new("SimpleModel", "stringField");
        assert!(!storage.has_mapping(&key));

        storage.add_mapping(key.clone(), |_| Value::String("mapped".into()));
        assert!(storage.has_mapping(&key));
        let mapping = storage.get_mapping(&key).unwrap();
        assert_eq!(mapping(&GenerationConfig::default()), Value::String("mapped".into()));
        assert!(!storage.has_mapping(&FieldKey::new("OtherModel", "stringField")));
    }

    #[test]
    fn test_add_replaces_existing() {
        let storage = CustomFieldMappingStorage::new();
        let key = FieldKey::new("SimpleModel", "count");
        storage.add_mapping(key.clone(), |_| Value::Int(1));
        storage.add_mapping(key.clone(), |_| Value::Int(2));

        assert_eq!(storage.snapshot().len(), 1);
        let mapping = storage.get_mapping(&key).unwrap();
        assert_eq!(mapping(&GenerationConfig::default()), Value::Int(2));
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let storage = CustomFieldMappingStorage::new();
        let before = storage.snapshot();
        storage.add_mapping(FieldKey::new("A", "b"), |config| {
            Value::String(config.prefix().to_string())
        });
        assert!(before.is_empty());
        assert_eq!(storage.snapshot().len(), 1);
    }
}
