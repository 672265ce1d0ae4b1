//! Type metadata for the test data generator.
//!
//! This crate describes the "class world" the generator walks:
//!
//! - [`TypeDescriptor`] - Resolved type tree (raw type plus generic arguments)
//! - [`ClassDef`] - Declaration of a class: supertypes, fields, methods, constructors
//! - [`TypeUniverse`] - Registry of declarations with the built-in type hierarchy
//! - [`TypeResolver`] - Resolves member types in the context of a generic owner
//! - [`Value`] / [`Instance`] - Dynamic values produced by generation
//! - [`ModelSchema`] - Class declarations loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! type-meta (this crate)
//!    │
//!    └─── test-data-generator  (dispatches on TypeDescriptor, fills Instances)
//! ```
//!
//! # Example
//!
//! ```rust
//! use type_meta::{ClassDef, TypeDescriptor, TypeRef, TypeUniverse};
//!
//! let mut universe = TypeUniverse::new();
//! universe.register(ClassDef::class("SimpleModel").property("name", TypeRef::named("String")));
//!
//! let instance = universe.instantiate(&TypeDescriptor::of("SimpleModel")).unwrap();
//! assert!(instance.get("name").unwrap().is_null());
//! ```

pub mod model;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod universe;
pub mod values;

pub use model::{
    setter_name, ClassDef, ClassKind, ConstructorDef, FieldDef, InvocationError, MethodBody,
    MethodDef, MethodFn, Visibility,
};
pub use resolver::{is_compatible, Bindings, DefaultTypeResolver, TypeResolver};
pub use schema::{ClassSchema, FieldSchema, MethodSchema, ModelSchema, SchemaError};
pub use types::{
    ParseError, TypeDescriptor, TypeName, TypeRef, ARRAY_TYPE, MAX_TYPE_NESTING, OBJECT_TYPE,
};
pub use universe::{InstantiationError, TypeUniverse};
pub use values::{Instance, Value};
