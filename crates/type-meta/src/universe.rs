//! Registry of class declarations and the type hierarchy queries built on it.
//!
//! A fresh [`TypeUniverse`] already knows the built-in types the generator dispatches on
//! (strings, boxed numbers, primitives, collection interfaces and their standard
//! implementations, temporal types). User models are registered on top.

use crate::model::{ClassDef, ConstructorDef, InvocationError, MethodBody, MethodDef, Visibility};
use crate::types::{TypeDescriptor, TypeName, TypeRef, OBJECT_TYPE};
use crate::values::{Instance, Value};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Failure to create an instance of a type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstantiationError {
    /// The type is not registered
    #[error("Type '{0}' is not registered")]
    UnknownType(String),

    /// Interfaces and abstract classes cannot be instantiated
    #[error("Type '{0}' is abstract")]
    Abstract(String),

    /// Primitives, enums and arrays are not created through constructors
    #[error("Type '{0}' is not a class")]
    NotAClass(String),

    /// No public zero-argument constructor is declared
    #[error("Target model '{0}' should have public constructor without arguments")]
    NoPublicNoArgConstructor(String),
}

/// All known class declarations.
#[derive(Debug, Clone)]
pub struct TypeUniverse {
    classes: HashMap<TypeName, ClassDef>,
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse {
    /// Create a universe containing the built-in types.
    pub fn new() -> Self {
        let mut universe = Self {
            classes: HashMap::new(),
        };
        for def in builtin_classes() {
            universe.register(def);
        }
        universe
    }

    /// Register (or replace) a class declaration.
    pub fn register(&mut self, def: ClassDef) -> &mut Self {
        debug!("Registering type '{}'", def.name);
        self.classes.insert(def.name.clone(), def);
        self
    }

    /// Look up a class declaration.
    pub fn get(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Whether a type is registered. Arrays are always known.
    pub fn contains(&self, name: &str) -> bool {
        name == crate::types::ARRAY_TYPE || self.classes.contains_key(name)
    }

    /// Whether every raw type mentioned by the descriptor is known.
    pub fn is_known(&self, ty: &TypeDescriptor) -> bool {
        self.contains(ty.raw()) && ty.args().iter().all(|arg| self.is_known(arg))
    }

    /// Names of all registered types, sorted.
    pub fn names(&self) -> Vec<&TypeName> {
        let mut names: Vec<&TypeName> = self.classes.keys().collect();
        names.sort();
        names
    }

    /// Direct supertypes of a type: superclass first, then interfaces.
    ///
    /// Classes without an explicit superclass extend `Object`; interfaces, primitives and
    /// `Object` itself do not.
    pub fn direct_supertypes<'a>(&'a self, def: &'a ClassDef) -> Vec<&'a TypeRef> {
        let mut supertypes = Vec::with_capacity(1 + def.interfaces.len());
        if let Some(superclass) = &def.superclass {
            supertypes.push(superclass);
        }
        supertypes.extend(def.interfaces.iter());
        supertypes
    }

    /// Whether a value of type `descendant` can be assigned to `ancestor`.
    ///
    /// Reflexive. Walks superclasses and interfaces. `Object` is an ancestor of every
    /// non-primitive type, arrays included. Unknown types are only assignable to themselves.
    pub fn is_assignable_from(&self, ancestor: &str, descendant: &str) -> bool {
        if ancestor == descendant {
            return true;
        }
        if ancestor == OBJECT_TYPE {
            return self
                .get(descendant)
                .map(|def| !def.is_primitive())
                .unwrap_or(descendant == crate::types::ARRAY_TYPE);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([descendant]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let Some(def) = self.get(current) else {
                continue;
            };
            for supertype in self.direct_supertypes(def) {
                let name = match supertype {
                    TypeRef::Named { name, .. } => name.as_str(),
                    TypeRef::Array(_) => continue,
                };
                if name == ancestor {
                    return true;
                }
                queue.push_back(name);
            }
        }
        false
    }

    /// Class chain of a type: the type itself, then each superclass, excluding `Object`.
    pub fn class_chain(&self, name: &str) -> Vec<&ClassDef> {
        let mut chain = Vec::new();
        let mut current = self.get(name);
        while let Some(def) = current {
            if def.name.as_str() == OBJECT_TYPE || chain.iter().any(|c: &&ClassDef| c.name == def.name) {
                break;
            }
            chain.push(def);
            current = match &def.superclass {
                Some(TypeRef::Named { name, .. }) => self.get(name),
                _ => None,
            };
        }
        chain
    }

    /// Create an instance through the public zero-argument constructor.
    ///
    /// Every non-static field of the class and its ancestors starts at its default value.
    /// The class itself does not need to be public.
    pub fn instantiate(&self, ty: &TypeDescriptor) -> Result<Instance, InstantiationError> {
        let name = ty.raw().as_str();
        debug!("Trying to create {} instance", name);
        let def = self
            .get(name)
            .ok_or_else(|| InstantiationError::UnknownType(name.to_string()))?;

        if def.is_interface() || def.is_abstract {
            return Err(InstantiationError::Abstract(name.to_string()));
        }
        if !def.is_concrete_class() {
            return Err(InstantiationError::NotAClass(name.to_string()));
        }
        if !def.constructors.iter().any(is_public_no_args) {
            return Err(InstantiationError::NoPublicNoArgConstructor(name.to_string()));
        }

        let mut fields = BTreeMap::new();
        for class in self.class_chain(name).into_iter().rev() {
            for field in class.fields.iter().filter(|f| !f.is_static) {
                fields.insert(field.name.clone(), self.default_value(&field.ty));
            }
        }
        debug!("Successfully created {} instance", name);
        Ok(Instance::new(def.name.clone(), fields))
    }

    /// Invoke a single-argument method on an instance.
    pub fn invoke(
        &self,
        method: &MethodDef,
        instance: &mut Instance,
        argument: Value,
    ) -> Result<(), InvocationError> {
        let declaring_is_public = self
            .get(&method.declaring)
            .map(|def| def.visibility.is_public())
            .unwrap_or(false);
        if !declaring_is_public || !method.visibility.is_public() {
            return Err(InvocationError::IllegalAccess {
                class: method.declaring.clone(),
                method: method.name.clone(),
            });
        }
        if method.params.len() != 1 {
            return Err(InvocationError::IllegalArgument {
                method: method.name.clone(),
                reason: format!("expected 1 argument but method takes {}", method.params.len()),
            });
        }
        if argument.is_null() && self.is_primitive_ref(&method.params[0]) {
            return Err(InvocationError::IllegalArgument {
                method: method.name.clone(),
                reason: format!("null passed to primitive parameter '{}'", method.params[0]),
            });
        }

        match &method.body {
            MethodBody::Assign(field) => {
                instance.set(field.clone(), argument);
                Ok(())
            }
            MethodBody::Custom(body) => {
                body(instance, argument).map_err(|reason| InvocationError::Failed {
                    method: method.name.clone(),
                    reason,
                })
            }
            MethodBody::Noop => Ok(()),
        }
    }

    fn is_primitive_ref(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Named { name, .. } => self.get(name).is_some_and(ClassDef::is_primitive),
            TypeRef::Array(_) => false,
        }
    }

    fn default_value(&self, ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Named { name, .. } => self
                .get(name)
                .map(ClassDef::default_value)
                .unwrap_or(Value::Null),
            TypeRef::Array(_) => Value::Null,
        }
    }
}

fn is_public_no_args(constructor: &ConstructorDef) -> bool {
    constructor.visibility == Visibility::Public && constructor.params.is_empty()
}

fn named(name: &str) -> TypeRef {
    TypeRef::named(name)
}

fn generic(name: &str, args: &[&str]) -> TypeRef {
    TypeRef::generic(name, args.iter().map(|arg| TypeRef::named(*arg)).collect())
}

/// Declarations of the built-in types.
fn builtin_classes() -> Vec<ClassDef> {
    let mut classes = vec![
        ClassDef::class("Object"),
        ClassDef::interface("Serializable"),
        ClassDef::interface("Comparable").type_params(["T"]),
        ClassDef::interface("CharSequence"),
        ClassDef::bare_class("String")
            .implements(named("Serializable"))
            .implements(generic("Comparable", &["String"]))
            .implements(named("CharSequence")),
        ClassDef::bare_class("Boolean")
            .implements(named("Serializable"))
            .implements(generic("Comparable", &["Boolean"])),
        ClassDef::bare_class("Character")
            .implements(named("Serializable"))
            .implements(generic("Comparable", &["Character"])),
        ClassDef::abstract_class("Number").implements(named("Serializable")),
    ];

    for (boxed, primitive) in [
        ("Byte", "byte"),
        ("Short", "short"),
        ("Integer", "int"),
        ("Long", "long"),
        ("Float", "float"),
        ("Double", "double"),
    ] {
        classes.push(
            ClassDef::bare_class(boxed)
                .extends(named("Number"))
                .implements(generic("Comparable", &[boxed])),
        );
        classes.push(ClassDef::primitive(primitive, boxed));
    }
    classes.push(ClassDef::primitive("boolean", "Boolean"));
    classes.push(ClassDef::primitive("char", "Character"));

    classes.extend([
        ClassDef::interface("Iterable").type_params(["T"]),
        ClassDef::interface("Collection")
            .type_params(["E"])
            .implements(generic("Iterable", &["E"])),
        ClassDef::interface("List")
            .type_params(["E"])
            .implements(generic("Collection", &["E"])),
        ClassDef::interface("Set")
            .type_params(["E"])
            .implements(generic("Collection", &["E"])),
        ClassDef::abstract_class("AbstractCollection")
            .type_params(["E"])
            .implements(generic("Collection", &["E"])),
        ClassDef::abstract_class("AbstractList")
            .type_params(["E"])
            .extends(generic("AbstractCollection", &["E"]))
            .implements(generic("List", &["E"])),
        ClassDef::class("ArrayList")
            .type_params(["E"])
            .extends(generic("AbstractList", &["E"]))
            .implements(generic("List", &["E"]))
            .implements(named("Serializable")),
        ClassDef::class("LinkedList")
            .type_params(["E"])
            .extends(generic("AbstractList", &["E"]))
            .implements(generic("List", &["E"]))
            .implements(named("Serializable")),
        ClassDef::abstract_class("AbstractSet")
            .type_params(["E"])
            .extends(generic("AbstractCollection", &["E"]))
            .implements(generic("Set", &["E"])),
        ClassDef::class("HashSet")
            .type_params(["E"])
            .extends(generic("AbstractSet", &["E"]))
            .implements(generic("Set", &["E"]))
            .implements(named("Serializable")),
        ClassDef::class("LinkedHashSet")
            .type_params(["E"])
            .extends(generic("HashSet", &["E"]))
            .implements(generic("Set", &["E"])),
        ClassDef::interface("Map").type_params(["K", "V"]),
        ClassDef::abstract_class("AbstractMap")
            .type_params(["K", "V"])
            .implements(generic("Map", &["K", "V"])),
        ClassDef::class("HashMap")
            .type_params(["K", "V"])
            .extends(generic("AbstractMap", &["K", "V"]))
            .implements(generic("Map", &["K", "V"]))
            .implements(named("Serializable")),
        ClassDef::class("LinkedHashMap")
            .type_params(["K", "V"])
            .extends(generic("HashMap", &["K", "V"]))
            .implements(generic("Map", &["K", "V"])),
        ClassDef::abstract_class("Dictionary").type_params(["K", "V"]),
        ClassDef::interface("TemporalAccessor"),
        ClassDef::bare_class("LocalDate")
            .implements(named("TemporalAccessor"))
            .implements(named("Serializable")),
        ClassDef::bare_class("LocalDateTime")
            .implements(named("TemporalAccessor"))
            .implements(named("Serializable")),
        ClassDef::bare_class("Instant")
            .implements(named("TemporalAccessor"))
            .implements(named("Serializable")),
        ClassDef::class("Date").implements(named("Serializable")),
        ClassDef::abstract_class("Calendar").implements(named("Serializable")),
        ClassDef::abstract_class("TimeZone").implements(named("Serializable")),
    ]);
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_builtin_hierarchy() {
        let universe = TypeUniverse::new();

        assert!(universe.is_assignable_from("Number", "Integer"));
        assert!(universe.is_assignable_from("Serializable", "Integer"));
        assert!(universe.is_assignable_from("Comparable", "Integer"));
        assert!(universe.is_assignable_from("Collection", "ArrayList"));
        assert!(universe.is_assignable_from("Iterable", "LinkedHashSet"));
        assert!(universe.is_assignable_from("Map", "LinkedHashMap"));
        assert!(universe.is_assignable_from("Object", "String"));
        assert!(universe.is_assignable_from("Object", "[]"));
        assert!(!universe.is_assignable_from("Object", "int"));
        assert!(!universe.is_assignable_from("Integer", "Number"));
        assert!(!universe.is_assignable_from("List", "Set"));
        assert!(universe.is_assignable_from("Unknown", "Unknown"));
        assert!(!universe.is_assignable_from("Object", "Unknown"));
    }

    #[test]
    fn test_class_chain_excludes_object() {
        let mut universe = TypeUniverse::new();
        universe.register(ClassDef::class("Base"));
        universe.register(ClassDef::class("Child").extends(TypeRef::named("Base")));

        let chain: Vec<&str> = universe
            .class_chain("Child")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(chain, vec!["Child", "Base"]);
    }

    #[test]
    fn test_instantiate_sets_defaults() {
        let mut universe = TypeUniverse::new();
        universe.register(ClassDef::class("Base").property("count", TypeRef::named("int")));
        universe.register(
            ClassDef::class("Child")
                .extends(TypeRef::named("Base"))
                .property("name", TypeRef::named("String"))
                .field_with("CONSTANT", TypeRef::named("String"), true, true),
        );

        let instance = universe.instantiate(&TypeDescriptor::of("Child")).unwrap();
        assert_eq!(instance.get("count"), Some(&Value::Int(0)));
        assert_eq!(instance.get("name"), Some(&Value::Null));
        assert_eq!(instance.get("CONSTANT"), None);
    }

    #[test]
    fn test_instantiate_errors() {
        let mut universe = TypeUniverse::new();
        universe.register(ClassDef::abstract_class("Shape"));
        universe.register(ClassDef::bare_class("NoCtor"));
        universe.register(
            ClassDef::bare_class("Protected")
                .constructor(ConstructorDef::no_args(Visibility::Protected)),
        );
        universe.register(ClassDef::bare_class("WithArgs").constructor(ConstructorDef {
            visibility: Visibility::Public,
            params: vec![TypeRef::named("String")],
        }));

        let instantiate = |name: &str| universe.instantiate(&TypeDescriptor::of(name));
        assert_eq!(
            instantiate("Shape"),
            Err(InstantiationError::Abstract("Shape".into()))
        );
        assert_eq!(
            instantiate("List"),
            Err(InstantiationError::Abstract("List".into()))
        );
        assert_eq!(
            instantiate("int"),
            Err(InstantiationError::NotAClass("int".into()))
        );
        assert!(matches!(
            instantiate("NoCtor"),
            Err(InstantiationError::NoPublicNoArgConstructor(_))
        ));
        assert!(matches!(
            instantiate("Protected"),
            Err(InstantiationError::NoPublicNoArgConstructor(_))
        ));
        assert!(matches!(
            instantiate("WithArgs"),
            Err(InstantiationError::NoPublicNoArgConstructor(_))
        ));
        assert!(matches!(
            instantiate("Missing"),
            Err(InstantiationError::UnknownType(_))
        ));
    }

    fn failing_body(_: &mut Instance, _: Value) -> Result<(), String> {
        Err("boom".to_string())
    }

    #[test]
    fn test_invoke_rules() {
        let mut universe = TypeUniverse::new();
        universe.register(
            ClassDef::class("Model")
                .property("count", TypeRef::named("int"))
                .method(MethodDef::public(
                    "fail",
                    TypeRef::named("String"),
                    MethodBody::Custom(Arc::new(failing_body)),
                )),
        );
        universe.register(
            ClassDef::class("Hidden")
                .with_visibility(Visibility::Package)
                .property("name", TypeRef::named("String")),
        );

        let model = universe.get("Model").unwrap().clone();
        let mut instance = universe.instantiate(&TypeDescriptor::of("Model")).unwrap();
        universe
            .invoke(&model.methods[0], &mut instance, Value::Int(7))
            .unwrap();
        assert_eq!(instance.get("count"), Some(&Value::Int(7)));

        assert!(matches!(
            universe.invoke(&model.methods[0], &mut instance, Value::Null),
            Err(InvocationError::IllegalArgument { .. })
        ));
        assert!(matches!(
            universe.invoke(&model.methods[1], &mut instance, Value::Null),
            Err(InvocationError::Failed { .. })
        ));

        let hidden = universe.get("Hidden").unwrap().clone();
        let mut hidden_instance = universe.instantiate(&TypeDescriptor::of("Hidden")).unwrap();
        assert!(matches!(
            universe.invoke(
                &hidden.methods[0],
                &mut hidden_instance,
                Value::String("x".into())
            ),
            Err(InvocationError::IllegalAccess { .. })
        ));
        assert_eq!(hidden_instance.get("name"), Some(&Value::Null));
    }
}
