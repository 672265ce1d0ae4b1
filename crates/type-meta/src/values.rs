//! Dynamic values produced by the generator.
//!
//! `Value` is the type-agnostic result of a generation call. Containers remember the
//! concrete class they were built as so that post-processing can rebuild the same shape.

use crate::types::TypeName;
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::BTreeMap;

/// A generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    Byte(i8),

    /// 16-bit signed integer
    Short(i16),

    /// 32-bit signed integer
    Int(i32),

    /// 64-bit signed integer
    Long(i64),

    /// 32-bit floating point
    Float(f32),

    /// 64-bit floating point
    Double(f64),

    /// Single character
    Char(char),

    /// String value
    String(String),

    /// Enum constant
    Enum {
        /// Enum class
        class: TypeName,
        /// Constant name
        constant: String,
    },

    /// Fixed-size array
    Array {
        /// Raw component type
        component: TypeName,
        /// Elements
        items: Vec<Value>,
    },

    /// List-family collection
    List {
        /// Concrete collection class
        class: TypeName,
        /// Elements in insertion order
        items: Vec<Value>,
    },

    /// Set-family collection; insertion ordered, no duplicates
    Set {
        /// Concrete collection class
        class: TypeName,
        /// Distinct elements in insertion order
        items: Vec<Value>,
    },

    /// Map-family collection; insertion ordered, unique keys
    Map {
        /// Concrete map class
        class: TypeName,
        /// Key/value pairs
        entries: Vec<(Value, Value)>,
    },

    /// Populated model instance
    Object(Instance),
}

impl Value {
    /// Create an empty list of the given class.
    pub fn list(class: impl Into<TypeName>) -> Self {
        Self::List {
            class: class.into(),
            items: Vec::new(),
        }
    }

    /// Create an empty set of the given class.
    pub fn set(class: impl Into<TypeName>) -> Self {
        Self::Set {
            class: class.into(),
            items: Vec::new(),
        }
    }

    /// Create an empty map of the given class.
    pub fn map(class: impl Into<TypeName>) -> Self {
        Self::Map {
            class: class.into(),
            entries: Vec::new(),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an instance.
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Elements of an array, list or set.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::Array { items, .. } | Self::List { items, .. } | Self::Set { items, .. } => {
                Some(items)
            }
            _ => None,
        }
    }

    /// Entries of a map.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Number of elements (or entries) of a container value.
    pub fn len(&self) -> Option<usize> {
        self.as_items()
            .map(<[Value]>::len)
            .or_else(|| self.as_entries().map(<[(Value, Value)]>::len))
    }

    /// Add an element to a list or set. Sets ignore elements they already contain.
    ///
    /// Returns `false` if the value is not a list or set, or the element was a duplicate.
    pub fn push(&mut self, item: Value) -> bool {
        match self {
            Self::List { items, .. } => {
                items.push(item);
                true
            }
            Self::Set { items, .. } => {
                if items.contains(&item) {
                    false
                } else {
                    items.push(item);
                    true
                }
            }
            _ => false,
        }
    }

    /// Put an entry into a map, replacing the value of an existing equal key.
    ///
    /// Returns the previous value for the key, if any.
    pub fn put(&mut self, key: Value, value: Value) -> Option<Value> {
        let Self::Map { entries, .. } = self else {
            return None;
        };
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Render this value as JSON.
    ///
    /// Maps whose keys are all strings become JSON objects; other maps become arrays of
    /// `[key, value]` pairs. Non-finite floats become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Byte(v) => JsonValue::from(*v),
            Self::Short(v) => JsonValue::from(*v),
            Self::Int(v) => JsonValue::from(*v),
            Self::Long(v) => JsonValue::from(*v),
            Self::Float(v) => JsonValue::from(f64::from(*v)),
            Self::Double(v) => JsonValue::from(*v),
            Self::Char(c) => JsonValue::String(c.to_string()),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Enum { constant, .. } => JsonValue::String(constant.clone()),
            Self::Array { items, .. } | Self::List { items, .. } | Self::Set { items, .. } => {
                JsonValue::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Map { entries, .. } => {
                if entries.iter().all(|(key, _)| key.as_str().is_some()) {
                    let object: JsonMap<String, JsonValue> = entries
                        .iter()
                        .filter_map(|(key, value)| {
                            key.as_str().map(|k| (k.to_string(), value.to_json()))
                        })
                        .collect();
                    JsonValue::Object(object)
                } else {
                    JsonValue::Array(
                        entries
                            .iter()
                            .map(|(key, value)| JsonValue::Array(vec![key.to_json(), value.to_json()]))
                            .collect(),
                    )
                }
            }
            Self::Object(instance) => instance.to_json(),
        }
    }
}

/// A model instance: its class and the current value of every non-static field.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: TypeName,
    fields: BTreeMap<String, Value>,
}

impl Instance {
    /// Create an instance with the given initial field values.
    pub fn new(class: impl Into<TypeName>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            class: class.into(),
            fields,
        }
    }

    /// The instance's class.
    pub fn class(&self) -> &TypeName {
        &self.class
    }

    /// Current value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Mutable access to a field value.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Overwrite a field value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// All fields, ordered by name.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Render the instance as a JSON object keyed by field name.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}
