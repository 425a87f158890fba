//! Schema model for loaded protobuf descriptor trees.
//!
//! A [`SchemaFile`] is what a single descriptor file contributes to the
//! catalog: its packages, and in each package the message and enum
//! definitions declared there. Field types are parsed into [`TypeRef`] and
//! [`Cardinality`] once, when the definition is built, so synthesis never has
//! to look at raw type strings again.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Packages of a single schema file keyed by their dotted name.
pub type PackageMap = BTreeMap<String, PackageDef>;

/// One loaded schema file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFile {
    pub filepath: String,
    pub packages: PackageMap,
}

impl SchemaFile {
    pub fn new(filepath: impl Into<String>, packages: PackageMap) -> Self {
        Self {
            filepath: filepath.into(),
            packages,
        }
    }

    pub fn package(&self, name: &str) -> Option<&PackageDef> {
        self.packages.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDef {
    pub name: String,
    pub messages: BTreeMap<String, MessageDef>,
    pub enums: BTreeMap<String, EnumDef>,
}

impl PackageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a message, replacing any previous definition with the same name.
    pub fn with_message(mut self, message: MessageDef) -> Self {
        self.insert_message(message);
        self
    }

    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.insert_enum(def);
        self
    }

    pub fn insert_message(&mut self, message: MessageDef) {
        self.messages.insert(message.name.clone(), message);
    }

    pub fn insert_enum(&mut self, def: EnumDef) {
        self.enums.insert(def.name.clone(), def);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.enums.is_empty()
    }
}

/// A message definition with its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl MessageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub values_by_id: BTreeMap<i32, String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values_by_id: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, id: i32, name: impl Into<String>) -> Self {
        self.values_by_id.insert(id, name.into());
        self
    }
}

/// Label a field was declared with, before map detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldLabel {
    #[default]
    Singular,
    Repeated,
}

/// How many values a field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Repeated,
    /// Map field with the given key type.
    Map(TypeRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub type_ref: TypeRef,
    pub cardinality: Cardinality,
}

impl FieldDef {
    /// Builds a field from its declared parts.
    ///
    /// A key type marks the field as a map and takes precedence over the
    /// label: a map field declared `repeated` is still a map.
    pub fn from_parts(
        name: impl Into<String>,
        type_name: &str,
        label: FieldLabel,
        key_type: Option<&str>,
    ) -> Self {
        let cardinality = match (key_type, label) {
            (Some(key), _) => Cardinality::Map(TypeRef::parse(key)),
            (None, FieldLabel::Repeated) => Cardinality::Repeated,
            (None, FieldLabel::Singular) => Cardinality::Singular,
        };
        Self {
            name: name.into(),
            type_ref: TypeRef::parse(type_name),
            cardinality,
        }
    }

    pub fn singular(name: impl Into<String>, type_name: &str) -> Self {
        Self::from_parts(name, type_name, FieldLabel::Singular, None)
    }

    pub fn repeated(name: impl Into<String>, type_name: &str) -> Self {
        Self::from_parts(name, type_name, FieldLabel::Repeated, None)
    }

    pub fn map(name: impl Into<String>, key_type: &str, value_type: &str) -> Self {
        Self::from_parts(name, value_type, FieldLabel::Singular, Some(key_type))
    }

    pub fn key_type(&self) -> Option<&TypeRef> {
        match &self.cardinality {
            Cardinality::Map(key) => Some(key),
            _ => None,
        }
    }
}

/// A field's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(ScalarKind),
    Named(QualifiedName),
}

impl TypeRef {
    pub fn parse(type_name: &str) -> Self {
        match type_name.parse::<ScalarKind>() {
            Ok(kind) => TypeRef::Scalar(kind),
            Err(_) => TypeRef::Named(QualifiedName::new(type_name)),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => write!(f, "{}", kind),
            TypeRef::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Dot-separated reference to a message or enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully-qualified names start with a dot (`.pkg.Type`).
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('.')
    }

    /// Splits into `(package path, leaf)`; the package path is `None` for a
    /// bare name. A leading dot is not part of the package path.
    pub fn split(&self) -> (Option<&str>, &str) {
        let trimmed = self.0.trim_start_matches('.');
        match trimmed.rsplit_once('.') {
            Some((package, leaf)) => (Some(package), leaf),
            None => (None, trimmed),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire scalar kinds recognised in field type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Double,
    Float,
    Bytes,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 16] = [
        ScalarKind::String,
        ScalarKind::Number,
        ScalarKind::Bool,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Uint32,
        ScalarKind::Uint64,
        ScalarKind::Sint32,
        ScalarKind::Sint64,
        ScalarKind::Fixed32,
        ScalarKind::Fixed64,
        ScalarKind::Sfixed32,
        ScalarKind::Sfixed64,
        ScalarKind::Double,
        ScalarKind::Float,
        ScalarKind::Bytes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Bool => "bool",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scalar type: {0}")]
pub struct UnknownScalar(pub String);

impl FromStr for ScalarKind {
    type Err = UnknownScalar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownScalar(s.to_string()))
    }
}
