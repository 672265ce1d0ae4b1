//! Type expressions and resolved type descriptors.
//!
//! Two layers describe a type:
//!
//! - [`TypeRef`] is a type expression as it is written in a class declaration. It may mention
//!   type variables of the declaring class (`List<T>`), so it is only meaningful together with
//!   the bindings of an owning type.
//! - [`TypeDescriptor`] is a fully resolved tree: a raw type name plus the ordered descriptors
//!   of its generic arguments. Descriptors are what the generator dispatches on.
//!
//! Both accept a Java-like textual syntax:
//!
//! ```text
//! String
//! List<SimpleModel>
//! Map<String, List<Integer>>
//! String[]
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Raw name used for array descriptors; the component type is the single generic argument.
pub const ARRAY_TYPE: &str = "[]";

/// Name of the universal base class.
pub const OBJECT_TYPE: &str = "Object";

/// Interned raw type name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a type name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved array name.
    pub fn is_array(&self) -> bool {
        &*self.0 == ARRAY_TYPE
    }
}

impl Deref for TypeName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TypeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TypeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Error produced when a type expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid type expression '{input}' at position {position}: {message}")]
pub struct ParseError {
    /// The full input that failed to parse
    pub input: String,
    /// Byte offset of the failure
    pub position: usize,
    /// What was expected
    pub message: String,
}

/// Unresolved type expression as declared on a field, method parameter or supertype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Named type with optional generic arguments. A bare name that matches a type
    /// parameter in scope is a type variable.
    Named {
        /// Raw type name (or type variable name)
        name: TypeName,
        /// Generic arguments
        args: Vec<TypeRef>,
    },

    /// Array of the component type.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// A named type without generic arguments.
    pub fn named(name: impl Into<TypeName>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A named type with generic arguments.
    pub fn generic(name: impl Into<TypeName>, args: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    /// An array of the given component type.
    pub fn array(component: TypeRef) -> Self {
        Self::Array(Box::new(component))
    }

    /// Parse a type expression such as `Map<String, List<T>>` or `int[]`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new(input);
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.position < input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(parsed)
    }

    /// Resolve this expression into a descriptor using the given type variable bindings.
    ///
    /// Bare names found in `bindings` are replaced by their bound descriptor.
    pub fn resolve(&self, bindings: &HashMap<String, TypeDescriptor>) -> TypeDescriptor {
        match self {
            Self::Array(component) => TypeDescriptor::array(component.resolve(bindings)),
            Self::Named { name, args } => {
                if args.is_empty() {
                    if let Some(bound) = bindings.get(name.as_str()) {
                        return bound.clone();
                    }
                }
                TypeDescriptor::new(
                    name.clone(),
                    args.iter().map(|arg| arg.resolve(bindings)).collect(),
                )
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(component) => write!(f, "{component}[]"),
            Self::Named { name, args } => {
                write!(f, "{name}")?;
                write_args(f, args)
            }
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TypeRef::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Resolved type: raw type plus ordered generic argument descriptors.
///
/// Two descriptors are the same type when their raw names are identical and their argument
/// lists match recursively, which is exactly the derived `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: TypeName,
    args: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Create a descriptor.
    pub fn new(raw: impl Into<TypeName>, args: Vec<TypeDescriptor>) -> Self {
        Self {
            raw: raw.into(),
            args,
        }
    }

    /// A descriptor without generic arguments.
    pub fn of(raw: impl Into<TypeName>) -> Self {
        Self::new(raw, Vec::new())
    }

    /// An array descriptor of the given component.
    pub fn array(component: TypeDescriptor) -> Self {
        Self::new(ARRAY_TYPE, vec![component])
    }

    /// The universal base type.
    pub fn object() -> Self {
        Self::of(OBJECT_TYPE)
    }

    /// Parse a concrete (variable free) type expression.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(TypeRef::parse(input)?.resolve(&HashMap::new()))
    }

    /// Raw type name.
    pub fn raw(&self) -> &TypeName {
        &self.raw
    }

    /// Generic argument descriptors, in declaration order.
    pub fn args(&self) -> &[TypeDescriptor] {
        &self.args
    }

    /// Generic argument at `index`, or `Object` when the type is used raw.
    pub fn arg_or_object(&self, index: usize) -> TypeDescriptor {
        self.args
            .get(index)
            .cloned()
            .unwrap_or_else(TypeDescriptor::object)
    }

    /// Whether this describes an array.
    pub fn is_array(&self) -> bool {
        self.raw.is_array()
    }

    /// Same descriptor with a different raw type and identical arguments.
    pub fn with_raw(&self, raw: impl Into<TypeName>) -> Self {
        Self::new(raw, self.args.clone())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array() {
            return write!(f, "{}[]", self.arg_or_object(0));
        }
        write!(f, "{}", self.raw)?;
        write_args(f, &self.args)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TypeDescriptor::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn write_args<T: fmt::Display>(f: &mut fmt::Formatter<'_>, args: &[T]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(">")
}

/// Deepest accepted nesting of generic argument lists.
pub const MAX_TYPE_NESTING: usize = 64;

/// Recursive descent parser for type expressions.
struct Parser<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            depth: 0,
        }
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            input: self.input.to_string(),
            position: self.position,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.position += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let name = self.parse_identifier()?;
        let mut args = Vec::new();
        if self.eat('<') {
            if self.depth == MAX_TYPE_NESTING {
                return Err(self.error("type arguments nested too deeply"));
            }
            self.depth += 1;
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
            self.depth -= 1;
        }
        let mut parsed = TypeRef::Named { name, args };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            parsed = TypeRef::array(parsed);
        }
        Ok(parsed)
    }

    fn parse_identifier(&mut self) -> Result<TypeName, ParseError> {
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            let valid = if self.position == start {
                c.is_alphabetic() || c == '_' || c == '$'
            } else {
                c.is_alphanumeric() || matches!(c, '_' | '$' | '.')
            };
            if !valid {
                break;
            }
            self.position += c.len_utf8();
        }
        if start == self.position {
            return Err(self.error("expected a type name"));
        }
        Ok(TypeName::new(&self.input[start..self.position]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        assert_eq!(TypeRef::parse("String").unwrap(), TypeRef::named("String"));
    }

    #[test]
    fn test_parse_nested_generics() {
        let parsed = TypeRef::parse("Map<String, List<Integer>>").unwrap();
        assert_eq!(
            parsed,
            TypeRef::generic(
                "Map",
                vec![
                    TypeRef::named("String"),
                    TypeRef::generic("List", vec![TypeRef::named("Integer")]),
                ]
            )
        );
        assert_eq!(parsed.to_string(), "Map<String, List<Integer>>");
    }

    #[test]
    fn test_parse_arrays() {
        let parsed = TypeDescriptor::parse("int[][]").unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.args()[0], TypeDescriptor::array(TypeDescriptor::of("int")));
        assert_eq!(parsed.to_string(), "int[][]");
    }

    #[test]
    fn test_parse_errors() {
        assert!(TypeRef::parse("").is_err());
        assert!(TypeRef::parse("List<String").is_err());
        assert!(TypeRef::parse("List<>").is_err());
        assert!(TypeRef::parse("String]").is_err());
        let err = TypeRef::parse("Map<String,,>").unwrap_err();
        assert_eq!(err.input, "Map<String,,>");
    }

    fn nested(depth: usize) -> String {
        format!("{}String{}", "List<".repeat(depth), ">".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        let parsed = TypeRef::parse(&nested(MAX_TYPE_NESTING)).unwrap();
        assert!(parsed.to_string().starts_with("List<List<"));

        let err = TypeRef::parse(&nested(MAX_TYPE_NESTING + 1)).unwrap_err();
        assert_eq!(err.message, "type arguments nested too deeply");
        assert_eq!(err.position, (MAX_TYPE_NESTING + 1) * "List<".len());

        let err = TypeDescriptor::parse(&nested(100_000)).unwrap_err();
        assert_eq!(err.message, "type arguments nested too deeply");
    }

    #[test]
    fn test_resolve_type_variables() {
        let mut bindings = HashMap::new();
        bindings.insert("T".to_string(), TypeDescriptor::parse("List<String>").unwrap());

        let resolved = TypeRef::parse("Map<T, T[]>").unwrap().resolve(&bindings);
        assert_eq!(resolved.to_string(), "Map<List<String>, List<String>[]>");
    }

    #[test]
    fn test_arg_or_object_for_raw_type() {
        let raw = TypeDescriptor::of("List");
        assert_eq!(raw.arg_or_object(0), TypeDescriptor::object());
    }
}
