//! Generation context.
//!
//! A [`TestDataGenerationContext`] bundles the modules a generation call works with: the type
//! resolver, the generator registry, the custom field mappings, the post-generation hooks and
//! the setter cache. The stores inside are shared and mutable; the set of modules is not.
//!
//! [`ContextManager`] owns the current module set and publishes a rebuilt context whenever a
//! module is replaced, so generations already in flight keep the context they started with.

use crate::hooks::PostGenerationHookStorage;
use crate::mapping::CustomFieldMappingStorage;
use crate::setter::SetterMapper;
use crate::storage::GeneratorStorage;
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use type_meta::{DefaultTypeResolver, TypeResolver, TypeUniverse};

/// Modules shared by every generation made through one context.
pub struct TestDataGenerationContext {
    type_resolver: Arc<dyn TypeResolver>,
    generator_storage: Arc<GeneratorStorage>,
    field_mapping_storage: Arc<CustomFieldMappingStorage>,
    hook_storage: Arc<PostGenerationHookStorage>,
    setter_mapper: SetterMapper,
}

impl TestDataGenerationContext {
    /// Context with default modules over `universe`.
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        Self::builder(universe).build()
    }

    pub fn builder(universe: Arc<TypeUniverse>) -> TestDataGenerationContextBuilder {
        TestDataGenerationContextBuilder::new(universe)
    }

    fn from_modules(modules: &ContextModules) -> Self {
        Self {
            type_resolver: modules.type_resolver.clone(),
            generator_storage: modules.generator_storage.clone(),
            field_mapping_storage: modules.field_mapping_storage.clone(),
            hook_storage: modules.hook_storage.clone(),
            setter_mapper: SetterMapper::new(),
        }
    }

    pub fn universe(&self) -> &TypeUniverse {
        self.type_resolver.universe()
    }

    pub fn type_resolver(&self) -> &dyn TypeResolver {
        self.type_resolver.as_ref()
    }

    pub fn generator_storage(&self) -> &GeneratorStorage {
        &self.generator_storage
    }

    pub fn field_mapping_storage(&self) -> &CustomFieldMappingStorage {
        &self.field_mapping_storage
    }

    pub fn hook_storage(&self) -> &PostGenerationHookStorage {
        &self.hook_storage
    }

    pub fn setter_mapper(&self) -> &SetterMapper {
        &self.setter_mapper
    }
}

impl fmt::Debug for TestDataGenerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDataGenerationContext")
            .field("generator_storage", &self.generator_storage)
            .field("field_mapping_storage", &self.field_mapping_storage)
            .field("hook_storage", &self.hook_storage)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TestDataGenerationContext`]. Modules left unset get their defaults.
pub struct TestDataGenerationContextBuilder {
    universe: Arc<TypeUniverse>,
    type_resolver: Option<Arc<dyn TypeResolver>>,
    generator_storage: Option<Arc<GeneratorStorage>>,
    field_mapping_storage: Option<Arc<CustomFieldMappingStorage>>,
    hook_storage: Option<Arc<PostGenerationHookStorage>>,
}

impl TestDataGenerationContextBuilder {
    fn new(universe: Arc<TypeUniverse>) -> Self {
        Self {
            universe,
            type_resolver: None,
            generator_storage: None,
            field_mapping_storage: None,
            hook_storage: None,
        }
    }

    pub fn type_resolver(mut self, type_resolver: Arc<dyn TypeResolver>) -> Self {
        self.type_resolver = Some(type_resolver);
        self
    }

    pub fn generator_storage(mut self, generator_storage: Arc<GeneratorStorage>) -> Self {
        self.generator_storage = Some(generator_storage);
        self
    }

    pub fn field_mapping_storage(mut self, field_mapping_storage: Arc<CustomFieldMappingStorage>) -> Self {
        self.field_mapping_storage = Some(field_mapping_storage);
        self
    }

    pub fn hook_storage(mut self, hook_storage: Arc<PostGenerationHookStorage>) -> Self {
        self.hook_storage = Some(hook_storage);
        self
    }

    pub fn build(self) -> TestDataGenerationContext {
        TestDataGenerationContext::from_modules(&self.into_modules())
    }

    fn into_modules(self) -> ContextModules {
        let universe = self.universe;
        let type_resolver = self.type_resolver.unwrap_or_else(|| {
            debug!("Using default type resolver");
            Arc::new(DefaultTypeResolver::new(universe))
        });
        let hook_storage = self.hook_storage.unwrap_or_else(|| {
            debug!("Using default post generation hook storage");
            Arc::new(PostGenerationHookStorage::new(type_resolver.shared_universe()))
        });
        let modules = ContextModules {
            type_resolver,
            generator_storage: self.generator_storage.unwrap_or_else(|| {
                debug!("Using default generator storage");
                Arc::new(GeneratorStorage::with_defaults())
            }),
            field_mapping_storage: self.field_mapping_storage.unwrap_or_else(|| {
                debug!("Using default custom field mapping storage");
                Arc::new(CustomFieldMappingStorage::new())
            }),
            hook_storage,
        };
        modules.bind_hooks();
        modules
    }
}

#[derive(Clone)]
struct ContextModules {
    type_resolver: Arc<dyn TypeResolver>,
    generator_storage: Arc<GeneratorStorage>,
    field_mapping_storage: Arc<CustomFieldMappingStorage>,
    hook_storage: Arc<PostGenerationHookStorage>,
}

impl ContextModules {
    /// Order the hooks for the resolver's universe.
    fn bind_hooks(&self) {
        self.hook_storage.rebind(self.type_resolver.shared_universe());
    }
}

/// Owns the current module set and the context built from it.
///
/// Replacing a module rebuilds the context right away while auto refresh is enabled (the
/// default). With auto refresh disabled, replacements accumulate until [`refresh`] is called.
///
/// [`refresh`]: ContextManager::refresh
pub struct ContextManager {
    modules: RwLock<ContextModules>,
    context: ArcSwap<TestDataGenerationContext>,
    auto_refresh: AtomicBool,
}

impl ContextManager {
    /// Manager over default modules for `universe`.
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        Self::from_builder(TestDataGenerationContext::builder(universe))
    }

    pub fn from_builder(builder: TestDataGenerationContextBuilder) -> Self {
        let modules = builder.into_modules();
        let context = TestDataGenerationContext::from_modules(&modules);
        Self {
            modules: RwLock::new(modules),
            context: ArcSwap::from_pointee(context),
            auto_refresh: AtomicBool::new(true),
        }
    }

    /// Current context.
    pub fn context(&self) -> Arc<TestDataGenerationContext> {
        self.context.load_full()
    }

    /// Rebuild the context from the current modules. The setter cache starts empty.
    pub fn refresh(&self) {
        let modules = self.modules.read();
        self.context
            .store(Arc::new(TestDataGenerationContext::from_modules(&modules)));
    }

    pub fn enable_auto_refresh(&self) {
        self.auto_refresh.store(true, Ordering::SeqCst);
    }

    pub fn disable_auto_refresh(&self) {
        self.auto_refresh.store(false, Ordering::SeqCst);
    }

    pub fn is_auto_refresh_enabled(&self) -> bool {
        self.auto_refresh.load(Ordering::SeqCst)
    }

    pub fn replace_type_resolver(&self, type_resolver: Arc<dyn TypeResolver>) {
        info!("Replacing type resolver");
        self.replace(|modules| {
            modules.type_resolver = type_resolver;
            modules.bind_hooks();
        });
    }

    pub fn replace_generator_storage(&self, generator_storage: Arc<GeneratorStorage>) {
        info!("Replacing generator storage");
        self.replace(|modules| modules.generator_storage = generator_storage);
    }

    pub fn replace_field_mapping_storage(&self, field_mapping_storage: Arc<CustomFieldMappingStorage>) {
        info!("Replacing custom field mapping storage");
        self.replace(|modules| modules.field_mapping_storage = field_mapping_storage);
    }

    pub fn replace_hook_storage(&self, hook_storage: Arc<PostGenerationHookStorage>) {
        info!("Replacing post generation hook storage");
        self.replace(|modules| {
            modules.hook_storage = hook_storage;
            modules.bind_hooks();
        });
    }

    fn replace<F: FnOnce(&mut ContextModules)>(&self, update: F) {
        update(&mut *self.modules.write());
        if self.is_auto_refresh_enabled() {
            self.refresh();
        }
    }
}

impl fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextManager")
            .field("context", &self.context.load_full())
            .field("auto_refresh", &self.is_auto_refresh_enabled())
            .finish()
    }
}
