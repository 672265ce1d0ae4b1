//! Map-family generator.

use super::{concrete_container_class, validate_arity, validate_target, ParameterizedGenerator};
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use crate::random;
use type_meta::{TypeDescriptor, TypeUniverse, Value};

const TARGET_TYPE: &str = "Map";

/// Produces maps for `Map` and every type related to it. Abstract targets become a
/// `HashMap`.
///
/// Each drawn entry generates a key and a value independently; a repeated key replaces the
/// earlier entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapGenerator;

impl ParameterizedGenerator for MapGenerator {
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
        validate_arity(ty, &[0, 2], "0 or 2")?;
        let class = concrete_container_class(universe, ty, "AbstractMap", "HashMap")?;

        let (key_type, value_type) = (ty.arg_or_object(0), ty.arg_or_object(1));
        let config = engine.config();
        let count = random::items_count(engine.rng(), config.min_items(), config.max_items());

        let mut map = Value::map(class);
        for _ in 0..count {
            let key = engine.generate(&key_type)?;
            let value = engine.generate(&value_type)?;
            map.put(key, value);
        }
        Ok(map)
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
        .with_seed(3)
    }

    #[test]
    fn test_interface_becomes_hash_map() {
        let config = GenerationConfig::builder().min_items(2).max_items(2).build().unwrap();
        let value = generator(config).generate("Map<String, Integer>").unwrap();

        let Value::Map { class, entries } = value else {
            panic!("expected map, got {value:?}");
        };
        assert_eq!(class.as_str(), "HashMap");
        assert_eq!(entries.len(), 2);
        for (key, value) in &entries {
            assert!(key.as_str().is_some());
            assert!(matches!(value, Value::Int(_)));
        }
    }

    #[test]
    fn test_concrete_class_kept() {
        let value = generator(GenerationConfig::default())
            .generate("LinkedHashMap<Integer, String>")
            .unwrap();
        assert!(matches!(value, Value::Map { ref class, .. } if class.as_str() == "LinkedHashMap"));
    }

    #[test]
    fn test_repeated_keys_replace() {
        let config = GenerationConfig::builder().min_items(8).max_items(8).build().unwrap();
        let value = generator(config).generate("Map<Boolean, String>").unwrap();
        let entries = value.as_entries().unwrap();
        assert!(!entries.is_empty() && entries.len() <= 2);
    }

    #[test]
    fn test_wrong_arity_fails() {
        let result = generator(GenerationConfig::default()).generate("Map<String>");
        assert!(matches!(
            result,
            Err(GenerationError::GenericArity { expected: "0 or 2", actual: 1, .. })
        ));
    }
}
