//! Resolution of member types in the context of an owning (possibly generic) type.

use crate::model::{ClassDef, FieldDef, MethodDef};
use crate::types::{TypeDescriptor, TypeRef};
use crate::universe::TypeUniverse;
use std::collections::HashMap;
use std::sync::Arc;

/// Type variable name to bound descriptor.
pub type Bindings = HashMap<String, TypeDescriptor>;

/// Resolves the concrete types of fields and method parameters.
pub trait TypeResolver: Send + Sync {
    /// The class registry this resolver works against.
    fn universe(&self) -> &TypeUniverse;

    /// Shared handle to the same registry, for stores that keep it beyond one call.
    fn shared_universe(&self) -> Arc<TypeUniverse>;

    /// Concrete type of `field` when accessed through an instance of `owner`.
    fn resolve_field(&self, owner: &TypeDescriptor, field: &FieldDef) -> TypeDescriptor;

    /// Concrete parameter types of `method` when invoked on an instance of `owner`.
    fn resolve_parameter_types(
        &self,
        owner: &TypeDescriptor,
        method: &MethodDef,
    ) -> Vec<TypeDescriptor>;

    /// Whether a value of type `source` fits where `target` is expected.
    fn are_types_compatible(&self, target: &TypeDescriptor, source: &TypeDescriptor) -> bool {
        is_compatible(self.universe(), target, source)
    }
}

/// Structural compatibility check.
///
/// The raw target must be assignable from the raw source. Generic arguments are compared
/// position by position when both sides declare the same number of them; a raw side matches
/// any parameterization.
pub fn is_compatible(universe: &TypeUniverse, target: &TypeDescriptor, source: &TypeDescriptor) -> bool {
    if !universe.is_assignable_from(target.raw(), source.raw()) {
        return false;
    }
    let (target_args, source_args) = (target.args(), source.args());
    if target_args.is_empty() || source_args.is_empty() || target_args.len() != source_args.len() {
        return true;
    }
    target_args
        .iter()
        .zip(source_args)
        .all(|(t, s)| is_compatible(universe, t, s))
}

/// Resolver backed by a shared [`TypeUniverse`].
#[derive(Debug, Clone)]
pub struct DefaultTypeResolver {
    universe: Arc<TypeUniverse>,
}

impl DefaultTypeResolver {
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        Self { universe }
    }

    /// Bindings of the type variables of `declaring` as seen from `owner`.
    ///
    /// Walks from `owner` through superclasses and interfaces, substituting arguments at each
    /// step. Variables without an argument (raw usage) are bound to `Object`.
    pub fn bindings_for(&self, owner: &TypeDescriptor, declaring: &str) -> Bindings {
        let mut visited = Vec::new();
        self.find_bindings(owner, declaring, &mut visited)
            .unwrap_or_default()
    }

    fn find_bindings(
        &self,
        current: &TypeDescriptor,
        declaring: &str,
        visited: &mut Vec<TypeDescriptor>,
    ) -> Option<Bindings> {
        if visited.contains(current) {
            return None;
        }
        visited.push(current.clone());

        let def = self.universe.get(current.raw())?;
        let bindings = bind_params(def, current);
        if current.raw().as_str() == declaring {
            return Some(bindings);
        }
        for supertype in self.universe.direct_supertypes(def) {
            let resolved = supertype.resolve(&bindings);
            if let Some(found) = self.find_bindings(&resolved, declaring, visited) {
                return Some(found);
            }
        }
        None
    }

    fn resolve_in(&self, owner: &TypeDescriptor, declaring: &str, ty: &TypeRef) -> TypeDescriptor {
        ty.resolve(&self.bindings_for(owner, declaring))
    }
}

fn bind_params(def: &ClassDef, descriptor: &TypeDescriptor) -> Bindings {
    def.type_params
        .iter()
        .enumerate()
        .map(|(idx, param)| (param.clone(), descriptor.arg_or_object(idx)))
        .collect()
}

impl TypeResolver for DefaultTypeResolver {
    fn universe(&self) -> &TypeUniverse {
        &self.universe
    }

    fn shared_universe(&self) -> Arc<TypeUniverse> {
        self.universe.clone()
    }

    fn resolve_field(&self, owner: &TypeDescriptor, field: &FieldDef) -> TypeDescriptor {
        self.resolve_in(owner, &field.declaring, &field.ty)
    }

    fn resolve_parameter_types(
        &self,
        owner: &TypeDescriptor,
        method: &MethodDef,
    ) -> Vec<TypeDescriptor> {
        let bindings = self.bindings_for(owner, &method.declaring);
        method.params.iter().map(|param| param.resolve(&bindings)).collect()
    }
}
