//! Recursive generation engine.
//!
//! The engine is the single recursion point: container and model generators call back into
//! [`GenerationEngine::generate`] for their element and field types. One engine serves one
//! top-level call and captures snapshots of the registries when it is created, so
//! registrations made while it runs do not affect it.
//!
//! Only model instances count towards the configured maximum depth: containers and leaf
//! values never end a branch, while a self-referential model stops nesting once the limit is
//! reached.

use crate::config::GenerationConfig;
use crate::context::TestDataGenerationContext;
use crate::error::GenerationError;
use crate::generators::GeneratorEntry;
use crate::hooks::{HookEntry, PostGenerationHook};
use crate::hierarchy::HierarchyStore;
use crate::mapping::FieldMappings;
use crate::picker::{GeneratorPicker, PickedGenerator};
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::warn;
use type_meta::{FieldDef, TypeDescriptor, TypeResolver, TypeUniverse, Value};

/// State of one top-level generation call.
pub struct GenerationEngine<'a> {
    context: &'a TestDataGenerationContext,
    config: &'a GenerationConfig,
    rng: StdRng,
    model_depth: usize,
    generators: Arc<Vec<GeneratorEntry>>,
    mappings: Arc<FieldMappings>,
    hooks: Arc<HierarchyStore<HookEntry>>,
}

impl<'a> GenerationEngine<'a> {
    /// Create an engine over the current registry contents of `context`.
    pub fn new(
        context: &'a TestDataGenerationContext,
        config: &'a GenerationConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            context,
            config,
            rng,
            model_depth: 0,
            generators: context.generator_storage().get_all(),
            mappings: context.field_mapping_storage().snapshot(),
            hooks: context.hook_storage().snapshot(),
        }
    }

    pub fn context(&self) -> &'a TestDataGenerationContext {
        self.context
    }

    pub fn config(&self) -> &'a GenerationConfig {
        self.config
    }

    pub fn resolver(&self) -> &'a dyn TypeResolver {
        self.context.type_resolver()
    }

    pub fn universe(&self) -> &'a TypeUniverse {
        self.context.type_resolver().universe()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Number of model instances currently being populated.
    pub fn model_depth(&self) -> usize {
        self.model_depth
    }

    /// Picker over this engine's registry snapshot.
    pub fn picker(&self) -> GeneratorPicker<'_> {
        GeneratorPicker::new(self.universe(), &self.generators, &self.mappings)
    }

    /// Generate a value of type `ty`.
    ///
    /// Yields `Null` when no generator matches.
    pub fn generate(&mut self, ty: &TypeDescriptor) -> Result<Value, GenerationError> {
        let picked = self.picker().pick_generator(ty);
        match picked {
            Some(generator) => self.run(&generator),
            None => Ok(Value::Null),
        }
    }

    /// Pick the generator for a model field: a custom mapping wins over the registry.
    pub fn pick_field_generator(
        &self,
        field: &FieldDef,
        field_type: &TypeDescriptor,
    ) -> Option<PickedGenerator> {
        self.picker().pick_field_generator(field, field_type)
    }

    /// Invoke a picked generator.
    pub fn run(&mut self, generator: &PickedGenerator) -> Result<Value, GenerationError> {
        generator.generate(self)
    }

    /// Populate a model instance one level deeper.
    ///
    /// Models past the configured maximum depth are left `Null`.
    pub fn nested_model<F>(&mut self, ty: &TypeDescriptor, populate: F) -> Result<Value, GenerationError>
    where
        F: FnOnce(&mut Self) -> Result<Value, GenerationError>,
    {
        if self.model_depth >= self.config.max_depth() {
            warn!(
                "Max depth {} reached while generating '{}', leaving value empty",
                self.config.max_depth(),
                ty
            );
            return Ok(Value::Null);
        }
        self.model_depth += 1;
        let result = populate(self);
        self.model_depth -= 1;
        result
    }

    /// Post-generation hooks applying to `ty`, most general first.
    pub fn post_generation_hooks(&self, ty: &TypeDescriptor) -> Vec<Arc<dyn PostGenerationHook>> {
        self.hooks
            .get_all(self.universe(), ty)
            .into_iter()
            .map(|entry| entry.hook().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{GeneratorEntry, IntegerGenerator};
    use rand::SeedableRng;
    use type_meta::{ClassDef, TypeRef};

    fn context() -> TestDataGenerationContext {
        let mut universe = TypeUniverse::new();
        universe.register(
            ClassDef::class("Node")
                .property("label", TypeRef::named("String"))
                .property("next", TypeRef::named("Node")),
        );
        TestDataGenerationContext::new(Arc::new(universe))
    }

    fn depth_of(value: &Value) -> usize {
        match value.as_object().and_then(|node| node.get("next")) {
            Some(next) => 1 + depth_of(next),
            None => 0,
        }
    }

    #[test]
    fn test_depth_guard_ends_recursion() {
        let context = context();
        let config = GenerationConfig::builder().max_depth(3).build().unwrap();
        let mut engine = GenerationEngine::new(&context, &config, StdRng::seed_from_u64(1));

        let value = engine.generate(&TypeDescriptor::of("Node")).unwrap();
        assert_eq!(engine.model_depth(), 0);
        // Node -> Node -> Node -> Null
        assert_eq!(depth_of(&value), 3);
    }

    #[test]
    fn test_unmatched_type_is_null() {
        let context = context();
        let config = GenerationConfig::default();
        let mut engine = GenerationEngine::new(&context, &config, StdRng::seed_from_u64(1));
        assert_eq!(engine.generate(&TypeDescriptor::of("LocalDate")).unwrap(), Value::Null);
    }

    #[test]
    fn test_registry_snapshot_taken_at_creation() {
        let context = TestDataGenerationContext::builder(Arc::new(TypeUniverse::new()))
            .generator_storage(Arc::new(crate::storage::GeneratorStorage::new()))
            .build();
        let config = GenerationConfig::default();
        let mut engine = GenerationEngine::new(&context, &config, StdRng::seed_from_u64(1));

        context
            .generator_storage()
            .add(GeneratorEntry::simple(IntegerGenerator));
        assert_eq!(engine.generate(&TypeDescriptor::of("Integer")).unwrap(), Value::Null);

        let mut fresh = GenerationEngine::new(&context, &config, StdRng::seed_from_u64(1));
        assert!(matches!(
            fresh.generate(&TypeDescriptor::of("Integer")).unwrap(),
            Value::Int(_)
        ));
    }
}
