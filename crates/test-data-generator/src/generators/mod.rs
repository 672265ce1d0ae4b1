//! Value generators.
//!
//! Two kinds of generators exist:
//!
//! - [`SimpleGenerator`] produces a value from the configuration alone (strings, numbers,
//!   booleans, characters).
//! - [`ParameterizedGenerator`] needs the full requested type tree (containers, enums,
//!   models) and usually recurses into the engine for element or field types.
//!
//! Both are registered as a [`GeneratorEntry`], which remembers the concrete generator type
//! so the registry can deduplicate and position entries relative to each other.

pub mod array;
pub mod enumeration;
pub mod list;
pub mod map;
pub mod pojo;
pub mod set;
pub mod simple;

use crate::config::GenerationConfig;
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use crate::random;
use rand::rngs::StdRng;
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;
use type_meta::{TypeDescriptor, TypeUniverse, Value};

pub use array::ArrayGenerator;
pub use enumeration::EnumGenerator;
pub use list::ListGenerator;
pub use map::MapGenerator;
pub use pojo::PojoGenerator;
pub use set::SetGenerator;
pub use simple::{
    BooleanGenerator, ByteGenerator, CharacterGenerator, DoubleGenerator, FloatGenerator,
    IntegerGenerator, LongGenerator, ShortGenerator, StringGenerator,
};

/// Generator that needs nothing but the configuration.
pub trait SimpleGenerator: Send + Sync + 'static {
    /// Type of the produced values.
    fn target_type(&self) -> &str;

    /// Whether a value of the target type can be assigned to `ty`.
    fn can_generate(&self, universe: &TypeUniverse, ty: &str) -> bool {
        universe.is_assignable_from(ty, self.target_type())
    }

    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> Value;
}

/// Generator that needs the requested type tree.
pub trait ParameterizedGenerator: Send + Sync + 'static {
    /// Whether this generator handles the (boxed) raw type `ty`.
    fn can_generate(&self, universe: &TypeUniverse, ty: &str) -> bool;

    fn generate(
        &self,
        engine: &mut GenerationEngine<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Value, GenerationError>;
}

/// Registered generator.
#[derive(Clone)]
pub enum GeneratorKind {
    Simple(Arc<dyn SimpleGenerator>),
    Parameterized(Arc<dyn ParameterizedGenerator>),
}

/// Registry entry: a generator plus the identity of its concrete type.
#[derive(Clone)]
pub struct GeneratorEntry {
    type_id: TypeId,
    type_name: &'static str,
    kind: GeneratorKind,
}

impl GeneratorEntry {
    pub fn simple<G: SimpleGenerator>(generator: G) -> Self {
        Self {
            type_id: TypeId::of::<G>(),
            type_name: type_name::<G>(),
            kind: GeneratorKind::Simple(Arc::new(generator)),
        }
    }

    pub fn parameterized<G: ParameterizedGenerator>(generator: G) -> Self {
        Self {
            type_id: TypeId::of::<G>(),
            type_name: type_name::<G>(),
            kind: GeneratorKind::Parameterized(Arc::new(generator)),
        }
    }

    /// Identity of the concrete generator type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the concrete generator type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn kind(&self) -> &GeneratorKind {
        &self.kind
    }

    /// Whether this entry wraps a generator of type `G`.
    pub fn is<G: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<G>()
    }

    pub fn can_generate(&self, universe: &TypeUniverse, ty: &str) -> bool {
        match &self.kind {
            GeneratorKind::Simple(generator) => generator.can_generate(universe, ty),
            GeneratorKind::Parameterized(generator) => generator.can_generate(universe, ty),
        }
    }
}

impl fmt::Debug for GeneratorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorEntry")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Check the generic argument count of a container type.
pub(crate) fn validate_arity(
    ty: &TypeDescriptor,
    allowed: &[usize],
    expected: &'static str,
) -> Result<(), GenerationError> {
    let actual = ty.args().len();
    if allowed.contains(&actual) {
        Ok(())
    } else {
        Err(GenerationError::GenericArity {
            type_name: ty.to_string(),
            expected,
            actual,
        })
    }
}

/// Fail when a parameterized generator is invoked for a type it does not handle.
pub(crate) fn validate_target<G: ParameterizedGenerator>(
    generator: &G,
    universe: &TypeUniverse,
    ty: &TypeDescriptor,
) -> Result<(), GenerationError> {
    if generator.can_generate(universe, ty.raw()) {
        Ok(())
    } else {
        Err(GenerationError::TypeMismatch {
            generator: type_name::<G>(),
            type_name: ty.to_string(),
        })
    }
}

/// Concrete class for a requested container type.
///
/// Types that a standard implementation can stand in for (interfaces and abstract bases)
/// get `default_class`; anything else must be instantiable itself.
pub(crate) fn concrete_container_class(
    universe: &TypeUniverse,
    ty: &TypeDescriptor,
    abstract_base: &str,
    default_class: &str,
) -> Result<type_meta::TypeName, GenerationError> {
    if universe.is_assignable_from(ty.raw(), abstract_base) {
        return Ok(type_meta::TypeName::new(default_class));
    }
    universe.instantiate(ty)?;
    Ok(ty.raw().clone())
}

/// Draw an item count from the configured bounds and generate that many `element` values.
pub(crate) fn generate_items(
    engine: &mut GenerationEngine<'_>,
    element: &TypeDescriptor,
) -> Result<Vec<Value>, GenerationError> {
    let config = engine.config();
    let count = random::items_count(engine.rng(), config.min_items(), config.max_items());
    (0..count).map(|_| engine.generate(element)).collect()
}

/// Default generators in registration order. The model generator matches almost anything,
/// so it comes last.
pub fn default_generators() -> Vec<GeneratorEntry> {
    vec![
        GeneratorEntry::simple(StringGenerator),
        GeneratorEntry::simple(BooleanGenerator),
        GeneratorEntry::simple(ByteGenerator),
        GeneratorEntry::simple(DoubleGenerator),
        GeneratorEntry::simple(FloatGenerator),
        GeneratorEntry::simple(IntegerGenerator),
        GeneratorEntry::simple(LongGenerator),
        GeneratorEntry::simple(ShortGenerator),
        GeneratorEntry::simple(CharacterGenerator),
        GeneratorEntry::parameterized(EnumGenerator),
        GeneratorEntry::parameterized(ArrayGenerator),
        GeneratorEntry::parameterized(ListGenerator),
        GeneratorEntry::parameterized(SetGenerator),
        GeneratorEntry::parameterized(MapGenerator),
        GeneratorEntry::parameterized(PojoGenerator),
    ]
}
