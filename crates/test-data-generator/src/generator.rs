//! Entry point for generating test data.

use crate::config::GenerationConfig;
use crate::context::TestDataGenerationContext;
use crate::engine::GenerationEngine;
use crate::error::GenerationError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use type_meta::{TypeDescriptor, Value};

/// Generates populated values for type expressions.
///
/// Without a seed every call draws fresh entropy. With a seed, call `n` uses an RNG seeded
/// from the base seed and `n`, so the same sequence of calls reproduces the same values.
pub struct TestDataGenerator {
    context: Arc<TestDataGenerationContext>,
    config: GenerationConfig,
    seed: Option<u64>,
    calls: AtomicU64,
}

impl TestDataGenerator {
    /// Generator with the default configuration.
    pub fn new(context: Arc<TestDataGenerationContext>) -> Self {
        Self {
            context,
            config: GenerationConfig::default(),
            seed: None,
            calls: AtomicU64::new(0),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Make generation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<TestDataGenerationContext> {
        &self.context
    }

    /// Generate a value for a type expression such as `List<SimpleModel>`.
    pub fn generate(&self, ty: &str) -> Result<Value, GenerationError> {
        let descriptor = TypeDescriptor::parse(ty)?;
        self.generate_descriptor(&descriptor)
    }

    /// Generate a value for a resolved type.
    ///
    /// Returns `Null` when no registered generator handles the type.
    pub fn generate_descriptor(&self, ty: &TypeDescriptor) -> Result<Value, GenerationError> {
        if !self.context.universe().is_known(ty) {
            return Err(GenerationError::UnknownType(ty.to_string()));
        }
        debug!("Generating test data for '{}'", ty);
        let mut engine = GenerationEngine::new(&self.context, &self.config, self.next_rng());
        engine.generate(ty)
    }

    /// Generate a value and convert it into `T` through its JSON form.
    pub fn generate_as<T: DeserializeOwned>(&self, ty: &str) -> Result<T, GenerationError> {
        let value = self.generate(ty)?;
        serde_json::from_value(value.to_json()).map_err(GenerationError::Deserialize)
    }

    fn next_rng(&self) -> StdRng {
        let index = self.calls.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))),
            None => StdRng::from_entropy(),
        }
    }
}
