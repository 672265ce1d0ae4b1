//! Field-provenance tagging.
//!
//! Rewrites every string reachable from a freshly generated field value so that it carries the
//! name of the field it was generated for:
//!
//! ```text
//! prefix + field + "-" + original-without-prefix
//! ```
//!
//! Map keys and values are tagged with `field-Key` and `field-Value`. Containers keep their
//! concrete class; anything that is neither a string nor a container passes through.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use type_meta::{TypeDescriptor, TypeUniverse, Value};

const STRING_TYPE: &str = "String";

/// Tag `value`, generated for `field` with the declared (resolved) type `ty`.
///
/// Fails only when two distinct map keys collapse to the same tagged key.
pub fn tag(
    config: &GenerationConfig,
    universe: &TypeUniverse,
    ty: &TypeDescriptor,
    value: Value,
    field: &str,
) -> Result<Value, GenerationError> {
    let tagger = Tagger { config, universe };
    tagger.tag(ty, value, field)
}

struct Tagger<'a> {
    config: &'a GenerationConfig,
    universe: &'a TypeUniverse,
}

impl Tagger<'_> {
    fn tag(&self, ty: &TypeDescriptor, value: Value, field: &str) -> Result<Value, GenerationError> {
        match value {
            Value::String(s) if self.universe.is_assignable_from(ty.raw(), STRING_TYPE) => {
                Ok(Value::String(self.tag_string(&s, field)))
            }
            Value::List { class, items } => Ok(Value::List {
                class,
                items: self.tag_items(&ty.arg_or_object(0), items, field)?,
            }),
            Value::Set { class, items } => {
                let mut set = Value::set(class);
                for item in self.tag_items(&ty.arg_or_object(0), items, field)? {
                    set.push(item);
                }
                Ok(set)
            }
            Value::Array { component, items } => Ok(Value::Array {
                component,
                items: self.tag_items(&ty.arg_or_object(0), items, field)?,
            }),
            Value::Map { class, entries } => self.tag_map(ty, class, entries, field),
            other => Ok(other),
        }
    }

    fn tag_string(&self, value: &str, field: &str) -> String {
        let prefix = self.config.prefix();
        let original = value.strip_prefix(prefix).unwrap_or(value);
        format!("{prefix}{field}-{original}")
    }

    fn tag_items(
        &self,
        element: &TypeDescriptor,
        items: Vec<Value>,
        field: &str,
    ) -> Result<Vec<Value>, GenerationError> {
        items
            .into_iter()
            .map(|item| self.tag(element, item, field))
            .collect()
    }

    fn tag_map(
        &self,
        ty: &TypeDescriptor,
        class: type_meta::TypeName,
        entries: Vec<(Value, Value)>,
        field: &str,
    ) -> Result<Value, GenerationError> {
        let (key_type, value_type) = (ty.arg_or_object(0), ty.arg_or_object(1));
        let (key_field, value_field) = (format!("{field}-Key"), format!("{field}-Value"));

        let mut map = Value::map(class);
        for (key, value) in entries {
            let key = self.tag(&key_type, key, &key_field)?;
            let value = self.tag(&value_type, value, &value_field)?;
            if map.put(key.clone(), value).is_some() {
                return Err(GenerationError::DuplicateKey {
                    field: field.to_string(),
                    key: key.to_json().to_string(),
                });
            }
        }
        Ok(map)
    }
}
