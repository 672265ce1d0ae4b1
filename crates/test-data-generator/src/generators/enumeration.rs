//! Enum generator.

use super::{validate_target, ParameterizedGenerator};
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use crate::random;
use type_meta::{TypeDescriptor, TypeUniverse, Value};

/// Picks one of the declared constants uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumGenerator;

impl ParameterizedGenerator for EnumGenerator {
    fn can_generate(&self, universe: &TypeUniverse, ty: &str) -> bool {
        universe
            .get(ty)
            .is_some_and(|def| def.enum_constants().is_some())
    }

    fn generate(
        &self,
        engine: &mut GenerationEngine<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Value, GenerationError> {
        let universe = engine.universe();
        validate_target(self, universe, ty)?;
        let constants = universe
            .get(ty.raw())
            .and_then(|def| def.enum_constants())
            .unwrap_or_default();

        let constant = random::item(engine.rng(), constants)
            .ok_or_else(|| GenerationError::EmptyEnum(ty.raw().to_string()))?;
        Ok(Value::Enum {
            class: ty.raw().clone(),
            constant: constant.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{GenerationError, TestDataGenerationContext, TestDataGenerator};
    use std::collections::HashSet;
    use std::sync::Arc;
    use type_meta::{ClassDef, TypeUniverse, Value};

    fn generator() -> TestDataGenerator {
        let mut universe = TypeUniverse::new();
        universe.register(ClassDef::enumeration("Color", ["RED", "GREEN", "BLUE"]));
        universe.register(ClassDef::enumeration("Nothing", Vec::<String>::new()));
        TestDataGenerator::new(Arc::new(TestDataGenerationContext::new(Arc::new(universe))))
            .with_seed(4)
    }

    #[test]
    fn test_picks_declared_constants() {
        let generator = generator();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            match generator.generate("Color").unwrap() {
                Value::Enum { class, constant } => {
                    assert_eq!(class.as_str(), "Color");
                    seen.insert(constant);
                }
                other => panic!("expected enum, got {other:?}"),
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_enum_fails() {
        assert!(matches!(
            generator().generate("Nothing"),
            Err(GenerationError::EmptyEnum(name)) if name == "Nothing"
        ));
    }
}
