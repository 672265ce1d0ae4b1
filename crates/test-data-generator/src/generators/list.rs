//! List-family generator.

use super::{concrete_container_class, generate_items, validate_arity, validate_target, ParameterizedGenerator};
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use type_meta::{TypeDescriptor, TypeUniverse, Value};

const TARGET_TYPE: &str = "List";

/// Produces lists for `List` and every type related to it (`Collection`, `Iterable`,
/// concrete list classes). Abstract targets become an `ArrayList`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListGenerator;

impl ParameterizedGenerator for ListGenerator {
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
        let class = concrete_container_class(universe, ty, "AbstractList", "ArrayList")?;

        let items = generate_items(engine, &ty.arg_or_object(0))?;
        Ok(Value::List { class, items })
    }
}

#[cfg(test)]
mod tests {
    use crate::{GenerationConfig, GenerationError, TestDataGenerationContext, TestDataGenerator};
    use std::sync::Arc;
    use type_meta::{ClassDef, TypeRef, TypeUniverse, Value};

    fn generator(config: GenerationConfig) -> TestDataGenerator {
        let mut universe = TypeUniverse::new();
        universe.register(ClassDef::bare_class("FixedList").extends(TypeRef::generic(
            "AbstractList",
            vec![TypeRef::named("String")],
        )));
        TestDataGenerator::new(Arc::new(TestDataGenerationContext::new(Arc::new(universe))))
            .with_config(config)
            .with_seed(11)
    }

    #[test]
    fn test_interface_becomes_array_list() {
        let config = GenerationConfig::builder().min_items(2).max_items(4).build().unwrap();
        let value = generator(config).generate("List<Integer>").unwrap();

        let Value::List { class, items } = value else {
            panic!("expected list, got {value:?}");
        };
        assert_eq!(class.as_str(), "ArrayList");
        assert!((2..=4).contains(&items.len()));
        assert!(items.iter().all(|item| matches!(item, Value::Int(_))));
    }

    #[test]
    fn test_concrete_class_kept() {
        let value = generator(GenerationConfig::default())
            .generate("LinkedList<String>")
            .unwrap();
        assert!(matches!(value, Value::List { ref class, .. } if class.as_str() == "LinkedList"));
    }

    #[test]
    fn test_collection_and_raw_types() {
        let generator = generator(GenerationConfig::default());
        let value = generator.generate("Collection<String>").unwrap();
        assert!(matches!(value, Value::List { ref class, .. } if class.as_str() == "ArrayList"));

        // raw list elements are generated as Object, which yields strings
        let value = generator.generate("List").unwrap();
        assert!(value.as_items().unwrap().iter().all(|item| item.as_str().is_some()));
    }

    #[test]
    fn test_empty_bounds() {
        let config = GenerationConfig::builder().min_items(0).max_items(0).build().unwrap();
        let value = generator(config).generate("List<String>").unwrap();
        assert_eq!(value.len(), Some(0));
    }

    #[test]
    fn test_wrong_arity_fails() {
        let result = generator(GenerationConfig::default()).generate("List<String, String>");
        assert!(matches!(result, Err(GenerationError::GenericArity { actual: 2, .. })));
    }

    #[test]
    fn test_uninstantiable_list_class_fails() {
        let result = generator(GenerationConfig::default()).generate("FixedList");
        assert!(matches!(result, Err(GenerationError::Instantiation(_))));
    }
}
