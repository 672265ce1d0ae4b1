//! Set-family generator.

use super::{concrete_container_class, generate_items, validate_arity, validate_target, ParameterizedGenerator};
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use type_meta::{TypeDescriptor, TypeUniverse, Value};

const TARGET_TYPE: &str = "Set";

/// Produces sets for `Set` and every type related to it. Abstract targets become a
/// `LinkedHashSet`.
///
/// Duplicate elements collapse, so a set may end up smaller than the drawn item count.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetGenerator;

impl ParameterizedGenerator for SetGenerator {
    fn can_generate(&self, universe: &TypeUniverse, ty: &str) -> bool {
        universe.is_assignable_from(TARGET_TYPE, ty) || universe.is_assignable_from(ty, TARGET_TYPE)
    }

    fn generate(
        &self,
        engine: &mut GenerationEngine<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Value, GenerationError> {
        let universe = engine.universe();
        validate_target(self, universe, ty)?;
        validate_arity(ty, &[0, 1], "0 or 1")?;
        let class = concrete_container_class(universe, ty, "AbstractSet", "LinkedHashSet")?;

        let mut set = Value::set(class);
        for item in generate_items(engine, &ty.arg_or_object(0))? {
            set.push(item);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use crate::{GenerationConfig, GenerationError, TestDataGenerationContext, TestDataGenerator};
    use std::sync::Arc;
    use type_meta::{TypeUniverse, Value};

    fn generator(config: GenerationConfig) -> TestDataGenerator {
        TestDataGenerator::new(Arc::new(TestDataGenerationContext::new(Arc::new(
            TypeUniverse::new(),
        ))))
        .with_config(config)
        .with_seed(5)
    }

    #[test]
    fn test_interface_becomes_linked_hash_set() {
        let config = GenerationConfig::builder().min_items(3).max_items(3).build().unwrap();
        let value = generator(config).generate("Set<String>").unwrap();

        let Value::Set { class, items } = value else {
            panic!("expected set, got {value:?}");
        };
        assert_eq!(class.as_str(), "LinkedHashSet");
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_concrete_class_kept() {
        let value = generator(GenerationConfig::default())
            .generate("HashSet<Long>")
            .unwrap();
        assert!(matches!(value, Value::Set { ref class, .. } if class.as_str() == "HashSet"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let config = GenerationConfig::builder().min_items(10).max_items(10).build().unwrap();
        let value = generator(config).generate("Set<Boolean>").unwrap();
        let items = value.as_items().unwrap();
        assert!(items.len() <= 2);
        assert!(!items.is_empty());
    }

    #[test]
    fn test_wrong_arity_fails() {
        let result = generator(GenerationConfig::default()).generate("Set<String, String>");
        assert!(matches!(result, Err(GenerationError::GenericArity { .. })));
    }
}
