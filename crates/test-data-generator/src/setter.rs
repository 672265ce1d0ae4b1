//! Setter resolution for model fields.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use type_meta::{FieldDef, MethodDef, TypeDescriptor, TypeRef, TypeResolver};

const SETTER_PREFIX: &str = "set";

/// A field together with the method used to assign it.
#[derive(Debug, Clone)]
pub struct SettableProperty {
    pub field: FieldDef,
    /// Field type resolved against the owner
    pub field_type: TypeDescriptor,
    pub setter: MethodDef,
}

/// Finds the method that assigns a field.
///
/// A candidate is a public, non-static method of the class or one of its superclasses named
/// either exactly like the field or `set` followed by the field name with its first letter
/// capitalized. It must take exactly one parameter whose resolved type is compatible with the
/// resolved field type. The first candidate wins, most derived class first.
#[derive(Debug, Default)]
pub struct SetterMapper {
    cache: RwLock<HashMap<TypeDescriptor, Arc<[SettableProperty]>>>,
}

impl SetterMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setter for `field` on instances of `owner`.
    pub fn find_matching_setter(
        &self,
        resolver: &dyn TypeResolver,
        owner: &TypeDescriptor,
        field: &FieldDef,
    ) -> Option<MethodDef> {
        find_setter(resolver, owner, field).map(|(setter, _)| setter)
    }

    /// All instance fields of `owner` and its superclasses that have a setter, most derived
    /// class first. Static and final fields are skipped.
    ///
    /// Results are cached per owner type.
    pub fn settable_properties(
        &self,
        resolver: &dyn TypeResolver,
        owner: &TypeDescriptor,
    ) -> Arc<[SettableProperty]> {
        if let Some(cached) = self.cache.read().get(owner) {
            return cached.clone();
        }

        let universe = resolver.universe();
        let mut properties = Vec::new();
        for class in universe.class_chain(owner.raw()) {
            for field in class.fields.iter().filter(|f| !f.is_static && !f.is_final) {
                match find_setter(resolver, owner, field) {
                    Some((setter, field_type)) => properties.push(SettableProperty {
                        field: field.clone(),
                        field_type,
                        setter,
                    }),
                    None => debug!("No setter found for field '{}.{}'", class.name, field.name),
                }
            }
        }

        let properties: Arc<[SettableProperty]> = properties.into();
        self.cache
            .write()
            .insert(owner.clone(), properties.clone());
        properties
    }

    /// Drop all cached lookups.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

/// First matching setter together with the resolved field type.
fn find_setter(
    resolver: &dyn TypeResolver,
    owner: &TypeDescriptor,
    field: &FieldDef,
) -> Option<(MethodDef, TypeDescriptor)> {
    // resolved only once a candidate with a matching name shows up
    let mut field_type: Option<TypeDescriptor> = None;
    for candidate in candidates(resolver, owner) {
        if !has_matching_name(&candidate.name, &field.name) {
            continue;
        }
        let resolved = field_type.get_or_insert_with(|| resolver.resolve_field(owner, field));
        if has_single_matching_parameter(resolver, owner, candidate, resolved) {
            return Some((candidate.clone(), resolved.clone()));
        }
    }
    None
}

/// Public, non-static methods of the class chain, most derived first. An overridden method
/// appears once, in its most derived declaration.
fn candidates<'a>(resolver: &'a dyn TypeResolver, owner: &TypeDescriptor) -> Vec<&'a MethodDef> {
    let mut seen: HashSet<(&str, &[TypeRef])> = HashSet::new();
    let mut methods = Vec::new();
    for class in resolver.universe().class_chain(owner.raw()) {
        for method in &class.methods {
            if !method.visibility.is_public() || method.is_static {
                continue;
            }
            if seen.insert((method.name.as_str(), method.params.as_slice())) {
                methods.push(method);
            }
        }
    }
    methods
}

fn has_matching_name(method: &str, field: &str) -> bool {
    if method == field {
        return true;
    }
    match method.strip_prefix(SETTER_PREFIX) {
        Some(rest) if !rest.is_empty() => lowercase_first_letter(rest) == field,
        _ => false,
    }
}

fn lowercase_first_letter(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

fn has_single_matching_parameter(
    resolver: &dyn TypeResolver,
    owner: &TypeDescriptor,
    candidate: &MethodDef,
    field_type: &TypeDescriptor,
) -> bool {
    if candidate.params.len() != 1 {
        return false;
    }
    resolver
        .resolve_parameter_types(owner, candidate)
        .first()
        .is_some_and(|param| resolver.are_types_compatible(field_type, param))
}
