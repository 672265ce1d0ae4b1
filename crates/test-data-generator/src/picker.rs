//! Generator selection.
//!
//! The registry is scanned in order and the first generator whose capability check holds
//! wins, so narrow generators must be registered before catch-all ones. Parameterized
//! generators are bound to the requested type tree, which turns every pick into a plain
//! "produce one value" callable.

use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use crate::generators::{GeneratorEntry, GeneratorKind, ParameterizedGenerator, SimpleGenerator};
use crate::mapping::{FieldKey, FieldMappingFn, FieldMappings};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use type_meta::{FieldDef, TypeDescriptor, TypeName, TypeUniverse, Value};

/// Parameterized generator bound to the type it was picked for.
#[derive(Clone)]
pub struct BoundGenerator {
    generator: Arc<dyn ParameterizedGenerator>,
    name: &'static str,
    ty: TypeDescriptor,
}

impl BoundGenerator {
    pub fn bound_type(&self) -> &TypeDescriptor {
        &self.ty
    }
}

/// Result of a pick, ready to produce one value.
#[derive(Clone)]
pub enum PickedGenerator {
    /// Registered simple generator
    Simple {
        generator: Arc<dyn SimpleGenerator>,
        name: &'static str,
    },
    /// Registered parameterized generator bound to a type
    Bound(BoundGenerator),
    /// Custom field mapping
    Custom(FieldMappingFn),
}

impl PickedGenerator {
    /// Name of the generator, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple { name, .. } => *name,
            Self::Bound(bound) => bound.name,
            Self::Custom(_) => "custom field mapping",
        }
    }

    /// Whether the value comes from a custom field mapping.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    pub(crate) fn generate(&self, engine: &mut GenerationEngine<'_>) -> Result<Value, GenerationError> {
        match self {
            Self::Simple { generator, name } => {
                debug!("Trying to generate test data for '{}'", generator.target_type());
                let config = engine.config();
                let value = generator.generate(config, engine.rng());
                debug!("Successfully generated test data with '{}'", name);
                Ok(value)
            }
            Self::Bound(bound) => {
                debug!("Trying to generate test data for '{}'", bound.ty);
                let value = bound.generator.generate(engine, &bound.ty)?;
                debug!("Successfully generated test data for '{}'", bound.ty);
                Ok(value)
            }
            Self::Custom(mapping) => Ok(mapping(engine.config())),
        }
    }
}

impl fmt::Debug for PickedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PickedGenerator").field(&self.name()).finish()
    }
}

/// Chooses generators from a registry snapshot and the custom field mappings.
pub struct GeneratorPicker<'a> {
    universe: &'a TypeUniverse,
    generators: &'a [GeneratorEntry],
    mappings: &'a FieldMappings,
}

impl<'a> GeneratorPicker<'a> {
    pub fn new(
        universe: &'a TypeUniverse,
        generators: &'a [GeneratorEntry],
        mappings: &'a FieldMappings,
    ) -> Self {
        Self {
            universe,
            generators,
            mappings,
        }
    }

    /// First registered generator able to produce `ty`.
    ///
    /// Primitive types are matched through their boxed counterpart.
    pub fn pick_generator(&self, ty: &TypeDescriptor) -> Option<PickedGenerator> {
        debug!("Trying to find matching generator for '{}' type", ty);
        let raw = self.boxed(ty.raw());
        let picked = self
            .generators
            .iter()
            .find(|entry| entry.can_generate(self.universe, &raw))
            .map(|entry| bind(entry, ty));
        match &picked {
            Some(generator) => debug!("Found matching generator: {}", generator.name()),
            None => debug!("Didn't find any matching generator"),
        }
        picked
    }

    /// Generator for a model field: its custom mapping if one is registered, otherwise the
    /// registry pick for the field's resolved type.
    pub fn pick_field_generator(
        &self,
        field: &FieldDef,
        field_type: &TypeDescriptor,
    ) -> Option<PickedGenerator> {
        if let Some(mapping) = self.mappings.get(&FieldKey::of(field)) {
            debug!("Using custom mapping for field '{}.{}'", field.declaring, field.name);
            return Some(PickedGenerator::Custom(mapping.clone()));
        }
        self.pick_generator(field_type)
    }

    fn boxed(&self, raw: &TypeName) -> TypeName {
        self.universe
            .get(raw)
            .and_then(|def| def.boxed())
            .unwrap_or(raw)
            .clone()
    }
}

fn bind(entry: &GeneratorEntry, ty: &TypeDescriptor) -> PickedGenerator {
    match entry.kind() {
        GeneratorKind::Simple(generator) => PickedGenerator::Simple {
            generator: generator.clone(),
            name: entry.type_name(),
        },
        GeneratorKind::Parameterized(generator) => PickedGenerator::Bound(BoundGenerator {
            generator: generator.clone(),
            name: entry.type_name(),
            ty: ty.clone(),
        }),
    }
}
