//! Generators for strings, booleans, numbers and characters.

use super::SimpleGenerator;
use crate::config::GenerationConfig;
use crate::random;
use rand::rngs::StdRng;
use type_meta::Value;

/// Random alphanumeric string wrapped in the configured prefix and postfix.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringGenerator;

impl SimpleGenerator for StringGenerator {
    fn target_type(&self) -> &str {
        "String"
    }

    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::String(format!(
            "{}{}{}",
            config.prefix(),
            random::default_string(rng),
            config.postfix()
        ))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanGenerator;

impl SimpleGenerator for BooleanGenerator {
    fn target_type(&self) -> &str {
        "Boolean"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Bool(random::boolean(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByteGenerator;

impl SimpleGenerator for ByteGenerator {
    fn target_type(&self) -> &str {
        "Byte"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Byte(random::byte(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleGenerator;

impl SimpleGenerator for DoubleGenerator {
    fn target_type(&self) -> &str {
        "Double"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Double(random::double(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatGenerator;

impl SimpleGenerator for FloatGenerator {
    fn target_type(&self) -> &str {
        "Float"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Float(random::float(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerGenerator;

impl SimpleGenerator for IntegerGenerator {
    fn target_type(&self) -> &str {
        "Integer"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Int(random::integer(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LongGenerator;

impl SimpleGenerator for LongGenerator {
    fn target_type(&self) -> &str {
        "Long"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Long(random::long(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortGenerator;

impl SimpleGenerator for ShortGenerator {
    fn target_type(&self) -> &str {
        "Short"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Short(random::short(rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterGenerator;

impl SimpleGenerator for CharacterGenerator {
    fn target_type(&self) -> &str {
        "Character"
    }

    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> Value {
        Value::Char(random::character(rng))
    }
}
