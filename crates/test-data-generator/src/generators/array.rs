//! Array generator.

use super::{generate_items, validate_arity, validate_target, ParameterizedGenerator};
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use type_meta::{TypeDescriptor, TypeUniverse, Value, ARRAY_TYPE};

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayGenerator;

impl ParameterizedGenerator for ArrayGenerator {
    fn can_generate(&self, _universe: &TypeUniverse, ty: &str) -> bool {
        ty == ARRAY_TYPE
    }

    fn generate(
        &self,
        engine: &mut GenerationEngine<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Value, GenerationError> {
        validate_target(self, engine.universe(), ty)?;
        validate_arity(ty, &[0, 1], "0 or 1")?;

        let component = ty.arg_or_object(0);
        let items = generate_items(engine, &component)?;
        Ok(Value::Array {
            component: component.raw().clone(),
            items,
        })
    }
}
