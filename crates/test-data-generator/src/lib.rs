//! Type-driven test data generation.
//!
//! Given a type expression such as `List<SimpleModel>`, the generator picks a value producer
//! for the type, recurses into container elements and model fields, and returns a populated
//! [`Value`](type_meta::Value) tree.
//!
//! # Architecture
//!
//! ```text
//! TestDataGenerator
//!    │
//!    └─── GenerationEngine ──── GeneratorPicker ──── GeneratorStorage
//!            │                       │
//!            │                       └─── CustomFieldMappingStorage
//!            │
//!            ├─── generators (simple, enum, array, list, set, map, pojo)
//!            │        │
//!            │        ├─── SetterMapper
//!            │        └─── provenance tagging
//!            │
//!            └─── PostGenerationHookStorage (HierarchyStore)
//! ```
//!
//! Registries live in a [`TestDataGenerationContext`]; a [`ContextManager`] swaps in a rebuilt
//! context when one of its modules is replaced.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use test_data_generator::{TestDataGenerationContext, TestDataGenerator};
//! use type_meta::{ClassDef, TypeRef, TypeUniverse};
//!
//! let mut universe = TypeUniverse::new();
//! universe.register(ClassDef::class("SimpleModel").property("name", TypeRef::named("String")));
//!
//! let context = Arc::new(TestDataGenerationContext::new(Arc::new(universe)));
//! let generator = TestDataGenerator::new(context).with_seed(42);
//! let models = generator.generate("List<SimpleModel>").unwrap();
//!
//! for model in models.as_items().unwrap() {
//!     let name = model.as_object().unwrap().get("name").unwrap();
//!     assert!(name.as_str().unwrap().starts_with("name-"));
//! }
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod generator;
pub mod generators;
pub mod hierarchy;
pub mod hooks;
pub mod mapping;
pub mod picker;
pub mod provenance;
pub mod random;
pub mod setter;
pub mod storage;

pub use config::{ConfigError, GenerationConfig, GenerationConfigBuilder};
pub use context::{ContextManager, TestDataGenerationContext, TestDataGenerationContextBuilder};
pub use engine::GenerationEngine;
pub use error::GenerationError;
pub use generator::TestDataGenerator;
pub use generators::{
    default_generators, GeneratorEntry, GeneratorKind, ParameterizedGenerator, SimpleGenerator,
};
pub use hierarchy::{HierarchyNode, HierarchyStore, Identified, Placement};
pub use hooks::{HookEntry, PostGenerationHook, PostGenerationHookStorage};
pub use mapping::{CustomFieldMappingStorage, FieldKey, FieldMappingFn, FieldMappings};
pub use picker::{BoundGenerator, GeneratorPicker, PickedGenerator};
pub use setter::{SettableProperty, SetterMapper};
pub use storage::GeneratorStorage;
