//! Post-generation hooks.
//!
//! A hook registered for a type runs on every generated model instance assignable to that
//! type, after all of its fields are populated. Hooks for more general types run first.

use crate::hierarchy::{HierarchyStore, Identified, Placement};
use parking_lot::RwLock;
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use type_meta::{Instance, TypeDescriptor, TypeUniverse};

/// Mutates a freshly generated instance.
pub trait PostGenerationHook: Send + Sync + 'static {
    fn post_generation(&self, instance: &mut Instance);
}

impl<F> PostGenerationHook for F
where
    F: Fn(&mut Instance) + Send + Sync + 'static,
{
    fn post_generation(&self, instance: &mut Instance) {
        self(instance)
    }
}

/// Registered hook plus the identity of its concrete type.
#[derive(Clone)]
pub struct HookEntry {
    type_id: TypeId,
    type_name: &'static str,
    hook: Arc<dyn PostGenerationHook>,
}

impl HookEntry {
    pub fn new<H: PostGenerationHook>(hook: H) -> Self {
        Self {
            type_id: TypeId::of::<H>(),
            type_name: type_name::<H>(),
            hook: Arc::new(hook),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn hook(&self) -> &Arc<dyn PostGenerationHook> {
        &self.hook
    }
}

impl Identified for HookEntry {
    fn identity(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Debug for HookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEntry")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Hooks per target type, kept in hierarchy order.
///
/// The order depends on the type universe the hooks were inserted under; [`rebind`] rebuilds
/// it for another universe. Readers take a snapshot; writers publish a modified copy.
///
/// [`rebind`]: PostGenerationHookStorage::rebind
pub struct PostGenerationHookStorage {
    state: RwLock<HookState>,
}

struct HookState {
    universe: Arc<TypeUniverse>,
    store: Arc<HierarchyStore<HookEntry>>,
}

impl PostGenerationHookStorage {
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        Self {
            state: RwLock::new(HookState {
                universe,
                store: Arc::new(HierarchyStore::new()),
            }),
        }
    }

    /// Universe the current hook order was built for.
    pub fn universe(&self) -> Arc<TypeUniverse> {
        self.state.read().universe.clone()
    }

    /// Re-insert every hook under `universe`.
    ///
    /// Hooks keep their registration order per type. A hook that now duplicates one already
    /// applying to its type is dropped.
    pub fn rebind(&self, universe: Arc<TypeUniverse>) {
        let mut state = self.state.write();
        if Arc::ptr_eq(&state.universe, &universe) {
            return;
        }

        let mut store = HierarchyStore::new();
        for node in state.store.nodes() {
            for entry in node.items() {
                if !store.insert(&universe, node.ty(), Placement::Last, entry.clone()) {
                    debug!(
                        "Dropping hook '{}' for '{}' after rebind",
                        entry.type_name(),
                        node.ty()
                    );
                }
            }
        }
        info!("Rebound {} post generation hook(s) to a new type universe", store.len());
        *state = HookState {
            universe,
            store: Arc::new(store),
        };
    }

    /// Register `hook` at the end of the list for `ty`.
    ///
    /// Ignored when a hook of the same type already applies to `ty`.
    pub fn add<H: PostGenerationHook>(&self, ty: &TypeDescriptor, hook: H) -> bool {
        self.insert(ty, Placement::Last, HookEntry::new(hook))
    }

    /// Register `hook` right before the hook of type `Target` registered for `ty`.
    pub fn add_before<Target: 'static, H: PostGenerationHook>(
        &self,
        ty: &TypeDescriptor,
        hook: H,
    ) -> bool {
        self.insert(ty, Placement::Before(TypeId::of::<Target>()), HookEntry::new(hook))
    }

    /// Register `hook` right after the hook of type `Target` registered for `ty`.
    pub fn add_after<Target: 'static, H: PostGenerationHook>(
        &self,
        ty: &TypeDescriptor,
        hook: H,
    ) -> bool {
        self.insert(ty, Placement::After(TypeId::of::<Target>()), HookEntry::new(hook))
    }

    /// Hooks applying to `ty`, most general first.
    pub fn get_all(&self, ty: &TypeDescriptor) -> Vec<HookEntry> {
        let state = self.state.read();
        state.store.get_all(&state.universe, ty)
    }

    pub fn snapshot(&self) -> Arc<HierarchyStore<HookEntry>> {
        self.state.read().store.clone()
    }

    fn insert(&self, ty: &TypeDescriptor, placement: Placement, entry: HookEntry) -> bool {
        let mut state = self.state.write();
        let mut store = (*state.store).clone();
        let inserted = store.insert(&state.universe, ty, placement, entry);
        if inserted {
            state.store = Arc::new(store);
        }
        inserted
    }
}

impl fmt::Debug for PostGenerationHookStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostGenerationHookStorage")
            .field("hooks", &self.state.read().store.len())
            .finish()
    }
}
