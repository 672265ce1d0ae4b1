//! YAML model schema.
//!
//! Describes user model classes declaratively so they can be registered into a
//! [`TypeUniverse`] without writing builder code:
//!
//! ```yaml
//! version: 1
//! classes:
//!   - name: SimpleModel
//!     fields:
//!       - name: stringField
//!         type: String
//!       - name: stringListField
//!         type: List<String>
//!   - name: Color
//!     kind: enum
//!     constants: [RED, GREEN]
//! ```

use crate::model::{
    setter_name, ClassDef, ConstructorDef, MethodBody, MethodDef, Visibility,
};
use crate::types::{ParseError, TypeRef};
use crate::universe::TypeUniverse;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A type expression in the schema is malformed
    #[error("Invalid type in class '{class}': {source}")]
    TypeParse {
        class: String,
        #[source]
        source: ParseError,
    },

    /// The same class is declared twice
    #[error("Class declared more than once: {0}")]
    DuplicateClass(String),
}

/// Kind of a declared class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    #[default]
    Class,
    Interface,
    Enum,
}

/// Visibility of the zero-argument constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorVisibility {
    #[default]
    Public,
    Protected,
    Private,
    /// No zero-argument constructor at all
    None,
}

/// Visibility of a declared method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodVisibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl From<MethodVisibility> for Visibility {
    fn from(value: MethodVisibility) -> Self {
        match value {
            MethodVisibility::Public => Visibility::Public,
            MethodVisibility::Protected => Visibility::Protected,
            MethodVisibility::Package => Visibility::Package,
            MethodVisibility::Private => Visibility::Private,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

/// Field declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    /// Field name
    pub name: String,

    /// Declared type expression
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether to declare a public `setX` method assigning the field
    #[serde(default = "default_true")]
    pub setter: bool,

    #[serde(default, rename = "static")]
    pub is_static: bool,

    #[serde(default, rename = "final")]
    pub is_final: bool,
}

/// Extra method declaration, for setters that do not follow the `setX` convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodSchema {
    /// Method name
    pub name: String,

    /// Parameter type expressions
    #[serde(default)]
    pub params: Vec<String>,

    #[serde(default)]
    pub visibility: MethodVisibility,

    #[serde(default, rename = "static")]
    pub is_static: bool,

    /// Field the single argument is stored into; the method does nothing when absent
    #[serde(default)]
    pub assigns: Option<String>,
}

/// Class declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassSchema {
    /// Class name
    pub name: String,

    #[serde(default)]
    pub kind: SchemaKind,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default = "default_true", rename = "public")]
    pub is_public: bool,

    /// Type parameter names
    #[serde(default)]
    pub type_params: Vec<String>,

    /// Superclass type expression
    #[serde(default)]
    pub extends: Option<String>,

    /// Implemented interface type expressions
    #[serde(default)]
    pub implements: Vec<String>,

    #[serde(default)]
    pub constructor: ConstructorVisibility,

    #[serde(default)]
    pub fields: Vec<FieldSchema>,

    #[serde(default)]
    pub methods: Vec<MethodSchema>,

    /// Enum constants
    #[serde(default)]
    pub constants: Vec<String>,
}

impl ClassSchema {
    fn parse_type(&self, expr: &str) -> Result<TypeRef, SchemaError> {
        TypeRef::parse(expr).map_err(|source| SchemaError::TypeParse {
            class: self.name.clone(),
            source,
        })
    }

    /// Build the class declaration.
    pub fn to_class_def(&self) -> Result<ClassDef, SchemaError> {
        let mut def = match self.kind {
            SchemaKind::Class => ClassDef::bare_class(self.name.as_str()),
            SchemaKind::Interface => ClassDef::interface(self.name.as_str()),
            SchemaKind::Enum => ClassDef::enumeration(self.name.as_str(), self.constants.clone()),
        };
        if self.is_abstract {
            def = def.into_abstract();
        }
        if !self.is_public {
            def = def.with_visibility(Visibility::Package);
        }
        def = def.type_params(self.type_params.clone());

        if let Some(superclass) = &self.extends {
            def = def.extends(self.parse_type(superclass)?);
        }
        for interface in &self.implements {
            def = def.implements(self.parse_type(interface)?);
        }

        if self.kind == SchemaKind::Class {
            let visibility = match self.constructor {
                ConstructorVisibility::Public => Some(Visibility::Public),
                ConstructorVisibility::Protected => Some(Visibility::Protected),
                ConstructorVisibility::Private => Some(Visibility::Private),
                ConstructorVisibility::None => None,
            };
            if let Some(visibility) = visibility {
                def = def.constructor(ConstructorDef::no_args(visibility));
            }
        }

        for field in &self.fields {
            let ty = self.parse_type(&field.field_type)?;
            if field.setter && !field.is_static {
                def = def.method(MethodDef::public(
                    setter_name(&field.name),
                    ty.clone(),
                    MethodBody::Assign(field.name.clone()),
                ));
            }
            def = def.field_with(field.name.as_str(), ty, field.is_static, field.is_final);
        }

        for method in &self.methods {
            let params = method
                .params
                .iter()
                .map(|param| self.parse_type(param))
                .collect::<Result<Vec<_>, _>>()?;
            let body = match &method.assigns {
                Some(field) => MethodBody::Assign(field.clone()),
                None => MethodBody::Noop,
            };
            let mut method_def = MethodDef::public(method.name.as_str(), TypeRef::named("Object"), body)
                .with_params(params)
                .with_visibility(method.visibility.into());
            if method.is_static {
                method_def = method_def.into_static();
            }
            def = def.method(method_def);
        }

        Ok(def)
    }
}

/// Model schema loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Class declarations
    #[serde(default)]
    pub classes: Vec<ClassSchema>,
}

impl ModelSchema {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: ModelSchema = serde_yaml::from_str(yaml)?;
        schema.class_defs()?;
        Ok(schema)
    }

    /// Build every class declaration, rejecting duplicates.
    pub fn class_defs(&self) -> Result<Vec<ClassDef>, SchemaError> {
        let mut seen = HashSet::new();
        self.classes
            .iter()
            .map(|class| {
                if !seen.insert(class.name.as_str()) {
                    return Err(SchemaError::DuplicateClass(class.name.clone()));
                }
                class.to_class_def()
            })
            .collect()
    }

    /// Register every class on top of the built-in types.
    pub fn into_universe(self) -> Result<TypeUniverse, SchemaError> {
        let mut universe = TypeUniverse::new();
        for def in self.class_defs()? {
            universe.register(def);
        }
        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;
    use std::io::Write;

    const SCHEMA: &str = r#"
version: 1
classes:
  - name: BaseModel
    abstract: true
    fields:
      - name: id
        type: long
  - name: SimpleModel
    extends: BaseModel
    fields:
      - name: stringField
        type: String
      - name: stringListField
        type: List<String>
      - name: CONSTANT
        type: String
        static: true
        final: true
  - name: Color
    kind: enum
    constants: [RED, GREEN, BLUE]
  - name: PrivateModel
    constructor: private
    fields:
      - name: name
        type: String
  - name: ShortNames
    fields:
      - name: value
        type: Integer
        setter: false
    methods:
      - name: value
        params: [Integer]
        assigns: value
"#;

    #[test]
    fn test_parse_schema() {
        let schema = ModelSchema::from_yaml(SCHEMA).unwrap();
        assert_eq!(schema.version, 1);
        assert_eq!(schema.classes.len(), 5);
        assert_eq!(schema.classes[2].kind, SchemaKind::Enum);
        assert_eq!(schema.classes[3].constructor, ConstructorVisibility::Private);
        assert!(schema.classes[1].fields[0].setter);
    }

    #[test]
    fn test_into_universe() {
        let universe = ModelSchema::from_yaml(SCHEMA).unwrap().into_universe().unwrap();

        assert!(universe.is_assignable_from("BaseModel", "SimpleModel"));
        let simple = universe.get("SimpleModel").unwrap();
        assert_eq!(simple.fields.len(), 3);
        assert_eq!(simple.methods.len(), 2);
        assert_eq!(
            universe.get("Color").unwrap().enum_constants().map(<[String]>::len),
            Some(3)
        );

        let instance = universe.instantiate(&TypeDescriptor::of("SimpleModel")).unwrap();
        assert_eq!(instance.get("id"), Some(&crate::values::Value::Long(0)));
        assert!(universe.instantiate(&TypeDescriptor::of("PrivateModel")).is_err());

        let short = universe.get("ShortNames").unwrap();
        assert_eq!(short.methods.len(), 1);
        assert_eq!(short.methods[0].name, "value");
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let yaml = "classes:\n  - name: A\n  - name: A\n";
        assert!(matches!(
            ModelSchema::from_yaml(yaml),
            Err(SchemaError::DuplicateClass(name)) if name == "A"
        ));
    }

    #[test]
    fn test_invalid_type_rejected() {
        let yaml = "classes:\n  - name: A\n    fields:\n      - name: f\n        type: List<\n";
        assert!(matches!(
            ModelSchema::from_yaml(yaml),
            Err(SchemaError::TypeParse { class, .. }) if class == "A"
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let schema = ModelSchema::from_file(file.path()).unwrap();
        assert_eq!(schema.classes[0].name, "BaseModel");
        assert!(matches!(
            ModelSchema::from_file("/nonexistent/schema.yaml"),
            Err(SchemaError::Io(_))
        ));
    }
}
