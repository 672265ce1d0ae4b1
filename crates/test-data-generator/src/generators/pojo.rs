//! Model (POJO) generator.
//!
//! Creates an instance through the public zero-argument constructor and fills every settable
//! field of the class and its superclasses. Field values come from the field's custom mapping
//! when one is registered, otherwise from the registry; registry values are tagged with the
//! field name before they are assigned. Post-generation hooks for the type run last.

use super::{validate_target, ParameterizedGenerator};
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use crate::provenance;
use tracing::{debug, error};
use type_meta::{TypeDescriptor, TypeUniverse, Value};

/// Types with dedicated value semantics that are never populated field by field.
const NON_MODEL_TYPES: &[&str] = &[
    "Iterable",
    "Map",
    "Number",
    "CharSequence",
    "Boolean",
    "Character",
    "TemporalAccessor",
    "Date",
    "Calendar",
    "TimeZone",
    "Dictionary",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PojoGenerator;

impl ParameterizedGenerator for PojoGenerator {
    /// Any registered class that is not a primitive, array, enum or one of the value types.
    fn can_generate(&self, universe: &TypeUniverse, ty: &str) -> bool {
        let Some(def) = universe.get(ty) else {
            return false;
        };
        !def.is_primitive()
            && def.enum_constants().is_none()
            && !NON_MODEL_TYPES
                .iter()
                .any(|base| universe.is_assignable_from(base, ty))
    }

    fn generate(
        &self,
        engine: &mut GenerationEngine<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Value, GenerationError> {
        validate_target(self, engine.universe(), ty)?;
        engine.nested_model(ty, |engine| populate(engine, ty))
    }
}

fn populate(engine: &mut GenerationEngine<'_>, ty: &TypeDescriptor) -> Result<Value, GenerationError> {
    let universe = engine.universe();
    let mut instance = universe.instantiate(ty).map_err(|e| {
        error!("Failed to create '{}' instance: {}", ty, e);
        e
    })?;

    let properties = engine
        .context()
        .setter_mapper()
        .settable_properties(engine.resolver(), ty);
    for property in properties.iter() {
        let field = &property.field;
        let Some(generator) = engine.pick_field_generator(field, &property.field_type) else {
            debug!("No generator for field '{}' of '{}', leaving default", field.name, ty);
            continue;
        };

        let mut value = engine.run(&generator)?;
        if !generator.is_custom() {
            value = provenance::tag(
                engine.config(),
                universe,
                &property.field_type,
                value,
                &field.name,
            )?;
        }
        if let Err(e) = universe.invoke(&property.setter, &mut instance, value) {
            error!("Failed to set value via '{}' method: {}", property.setter.name, e);
        }
    }

    for hook in engine.post_generation_hooks(ty) {
        hook.post_generation(&mut instance);
    }
    Ok(Value::Object(instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TestDataGenerationContext, TestDataGenerator};
    use std::sync::Arc;
    use type_meta::{ClassDef, ConstructorDef, Instance, MethodBody, MethodDef, TypeRef, Visibility};

    fn rejecting_setter(_: &mut Instance, _: Value) -> Result<(), String> {
        Err("rejected".to_string())
    }

    fn universe() -> TypeUniverse {
        let mut universe = TypeUniverse::new();
        universe.register(
            ClassDef::class("SimpleModel")
                .property("stringField", TypeRef::named("String"))
                .property("intField", TypeRef::named("int"))
                .field_with("COUNTER", TypeRef::named("int"), true, false),
        );
        universe.register(
            ClassDef::class("ChildModel")
                .extends(TypeRef::named("SimpleModel"))
                .property("childField", TypeRef::named("String")),
        );
        universe.register(
            ClassDef::class("FailingModel")
                .field("name", TypeRef::named("String"))
                .field("label", TypeRef::named("String"))
                .method(MethodDef::public(
                    "setName",
                    TypeRef::named("String"),
                    MethodBody::Custom(Arc::new(rejecting_setter)),
                ))
                .method(MethodDef::public(
                    "setLabel",
                    TypeRef::named("String"),
                    MethodBody::Assign("label".into()),
                )),
        );
        universe.register(
            ClassDef::bare_class("NoDefaultConstructor")
                .constructor(ConstructorDef::no_args(Visibility::Private))
                .property("name", TypeRef::named("String")),
        );
        universe.register(ClassDef::abstract_class("AbstractModel"));
        universe
    }

    fn generator() -> TestDataGenerator {
        TestDataGenerator::new(Arc::new(TestDataGenerationContext::new(Arc::new(universe()))))
            .with_seed(21)
    }

    fn can_generate(ty: &str) -> bool {
        PojoGenerator.can_generate(&universe(), ty)
    }

    #[test]
    fn test_can_generate_models_only() {
        assert!(can_generate("SimpleModel"));
        assert!(can_generate("AbstractModel"));
        assert!(!can_generate("String"));
        assert!(!can_generate("Integer"));
        assert!(!can_generate("int"));
        assert!(!can_generate("ArrayList"));
        assert!(!can_generate("HashMap"));
        assert!(!can_generate("LocalDate"));
        assert!(!can_generate("Dictionary"));
        assert!(!can_generate("[]"));
        assert!(!can_generate("Unregistered"));
    }

    #[test]
    fn test_fields_are_populated_and_tagged() {
        let value = generator().generate("SimpleModel").unwrap();
        let instance = value.as_object().unwrap();

        assert!(instance
            .get("stringField")
            .and_then(Value::as_str)
            .is_some_and(|s| s.starts_with("stringField-")));
        assert!(matches!(instance.get("intField"), Some(Value::Int(_))));
        assert!(instance.get("COUNTER").is_none());
    }

    #[test]
    fn test_inherited_fields_are_populated() {
        let value = generator().generate("ChildModel").unwrap();
        let instance = value.as_object().unwrap();
        assert_eq!(instance.class().as_str(), "ChildModel");
        for field in ["stringField", "childField"] {
            assert!(instance
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.starts_with(field)));
        }
    }

    #[test]
    fn test_failing_setter_leaves_default() {
        let value = generator().generate("FailingModel").unwrap();
        let instance = value.as_object().unwrap();
        assert_eq!(instance.get("name"), Some(&Value::Null));
        assert!(instance.get("label").and_then(Value::as_str).is_some());
    }

    #[test]
    fn test_instantiation_errors() {
        let generator = generator();
        assert!(matches!(
            generator.generate("NoDefaultConstructor"),
            Err(GenerationError::Instantiation(_))
        ));
        assert!(matches!(
            generator.generate("AbstractModel"),
            Err(GenerationError::Instantiation(_))
        ));
    }
}
