//! Class model: the structural description the generator walks instead of runtime reflection.
//!
//! A [`ClassDef`] declares what a model type looks like: its kind, supertypes, type
//! parameters, fields, methods and constructors. Builder helpers cover the common "bean"
//! shape of a private field with a public `setX` method.

use crate::types::{TypeName, TypeRef};
use crate::values::{Instance, Value};
use std::fmt;
use std::sync::Arc;

/// Member or class visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Accessible from anywhere
    Public,
    /// Accessible from subclasses and the same package
    Protected,
    /// Accessible from the same package only
    Package,
    /// Accessible from the declaring class only
    Private,
}

impl Visibility {
    /// Whether this is public visibility.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Kind of a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    /// Regular (possibly abstract) class
    Class,
    /// Interface
    Interface,
    /// Enumeration with its declared constants
    Enum {
        /// Constant names in declaration order
        constants: Vec<String>,
    },
    /// Primitive type with its boxed counterpart
    Primitive {
        /// Boxed class name (e.g. `Integer` for `int`)
        boxed: TypeName,
    },
}

/// Failure to invoke a method on an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    /// The declaring class is not accessible from the caller
    #[error("Method '{method}' of non-public class '{class}' is not accessible")]
    IllegalAccess {
        /// Declaring class
        class: TypeName,
        /// Method name
        method: String,
    },

    /// The argument does not fit the parameter
    #[error("Illegal argument for method '{method}': {reason}")]
    IllegalArgument {
        /// Method name
        method: String,
        /// Why the argument was rejected
        reason: String,
    },

    /// The method body itself failed
    #[error("Method '{method}' failed: {reason}")]
    Failed {
        /// Method name
        method: String,
        /// Failure reported by the body
        reason: String,
    },
}

/// Callback used as a custom method body.
pub type MethodFn = dyn Fn(&mut Instance, Value) -> Result<(), String> + Send + Sync;

/// What invoking a single-argument method does.
#[derive(Clone)]
pub enum MethodBody {
    /// Store the argument into the named field
    Assign(String),
    /// Run a callback with the instance and the argument
    Custom(Arc<MethodFn>),
    /// Do nothing
    Noop,
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign(field) => f.debug_tuple("Assign").field(field).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Noop => f.write_str("Noop"),
        }
    }
}

/// Declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared type, possibly mentioning type variables of the declaring class
    pub ty: TypeRef,
    /// Class that declares the field
    pub declaring: TypeName,
    /// Static fields belong to the class, not to instances
    pub is_static: bool,
    /// Final fields cannot be reassigned
    pub is_final: bool,
}

/// Declared method.
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Method visibility
    pub visibility: Visibility,
    /// Static methods have no receiver
    pub is_static: bool,
    /// Declared parameter types
    pub params: Vec<TypeRef>,
    /// Class that declares the method
    pub declaring: TypeName,
    /// Behavior when invoked
    pub body: MethodBody,
}

impl MethodDef {
    /// Public, non-static single-argument method with the given body.
    pub fn public(name: impl Into<String>, param: TypeRef, body: MethodBody) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            params: vec![param],
            declaring: TypeName::new(""),
            body,
        }
    }

    /// Change the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the method static.
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Replace the parameter list.
    pub fn with_params(mut self, params: Vec<TypeRef>) -> Self {
        self.params = params;
        self
    }
}

/// Declared constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDef {
    /// Constructor visibility
    pub visibility: Visibility,
    /// Declared parameter types
    pub params: Vec<TypeRef>,
}

impl ConstructorDef {
    /// Zero-argument constructor with the given visibility.
    pub fn no_args(visibility: Visibility) -> Self {
        Self {
            visibility,
            params: Vec::new(),
        }
    }
}

/// Declaration of a type.
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Type name
    pub name: TypeName,
    /// Kind of type
    pub kind: ClassKind,
    /// Abstract classes cannot be instantiated
    pub is_abstract: bool,
    /// Class visibility
    pub visibility: Visibility,
    /// Type parameter names in declaration order
    pub type_params: Vec<String>,
    /// Direct superclass; `None` means `Object` (or nothing, for `Object` itself)
    pub superclass: Option<TypeRef>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    pub interfaces: Vec<TypeRef>,
    /// Declared fields in declaration order
    pub fields: Vec<FieldDef>,
    /// Declared methods
    pub methods: Vec<MethodDef>,
    /// Declared constructors
    pub constructors: Vec<ConstructorDef>,
}

impl ClassDef {
    fn with_kind(name: impl Into<TypeName>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_abstract: false,
            visibility: Visibility::Public,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Public class with a public zero-argument constructor.
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name, ClassKind::Class).constructor(ConstructorDef::no_args(Visibility::Public))
    }

    /// Public class without any constructor.
    pub fn bare_class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    /// Abstract class without constructors.
    pub fn abstract_class(name: impl Into<TypeName>) -> Self {
        let mut def = Self::with_kind(name, ClassKind::Class);
        def.is_abstract = true;
        def
    }

    /// Interface.
    pub fn interface(name: impl Into<TypeName>) -> Self {
        let mut def = Self::with_kind(name, ClassKind::Interface);
        def.is_abstract = true;
        def
    }

    /// Enum with its constants.
    pub fn enumeration<I, S>(name: impl Into<TypeName>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(
            name,
            ClassKind::Enum {
                constants: constants.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Primitive type boxed by `boxed`.
    pub fn primitive(name: impl Into<TypeName>, boxed: impl Into<TypeName>) -> Self {
        Self::with_kind(
            name,
            ClassKind::Primitive {
                boxed: boxed.into(),
            },
        )
    }

    /// Declare type parameters.
    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the superclass.
    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Add an implemented interface.
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Set the class visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the class abstract.
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a constructor.
    pub fn constructor(mut self, constructor: ConstructorDef) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Replace all constructors.
    pub fn constructors(mut self, constructors: Vec<ConstructorDef>) -> Self {
        self.constructors = constructors;
        self
    }

    /// Add a private instance field without accessor.
    pub fn field(self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.field_with(name, ty, false, false)
    }

    /// Add a field with explicit static/final flags.
    pub fn field_with(
        mut self,
        name: impl Into<String>,
        ty: TypeRef,
        is_static: bool,
        is_final: bool,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            declaring: self.name.clone(),
            is_static,
            is_final,
        });
        self
    }

    /// Add a private field plus a public `setX` method assigning it.
    pub fn property(self, name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        let setter = MethodDef::public(setter_name(&name), ty.clone(), MethodBody::Assign(name.clone()));
        self.field(name, ty).method(setter)
    }

    /// Add a method.
    pub fn method(mut self, mut method: MethodDef) -> Self {
        method.declaring = self.name.clone();
        self.methods.push(method);
        self
    }

    /// Whether instances of this class can be created directly.
    pub fn is_concrete_class(&self) -> bool {
        matches!(self.kind, ClassKind::Class) && !self.is_abstract
    }

    /// Whether this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, ClassKind::Primitive { .. })
    }

    /// Whether this is an interface.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface)
    }

    /// Enum constants, if this is an enum.
    pub fn enum_constants(&self) -> Option<&[String]> {
        match &self.kind {
            ClassKind::Enum { constants } => Some(constants),
            _ => None,
        }
    }

    /// Boxed counterpart, if this is a primitive.
    pub fn boxed(&self) -> Option<&TypeName> {
        match &self.kind {
            ClassKind::Primitive { boxed } => Some(boxed),
            _ => None,
        }
    }

    /// Default value of a field of this type: zero for primitives, `Null` otherwise.
    pub fn default_value(&self) -> Value {
        match self.name.as_str() {
            "boolean" => Value::Bool(false),
            "byte" => Value::Byte(0),
            "short" => Value::Short(0),
            "int" => Value::Int(0),
            "long" => Value::Long(0),
            "float" => Value::Float(0.0),
            "double" => Value::Double(0.0),
            "char" => Value::Char('\0'),
            _ => Value::Null,
        }
    }
}

/// Conventional setter name for a field: `stringField` -> `setStringField`.
pub fn setter_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}
