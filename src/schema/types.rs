//! Schema description types
//!
//! A [`Schema`] is the externally supplied, read-only description of record
//! structure. It carries no analysis state; [`SchemaTree`](super::SchemaTree)
//! is built from it when an analyzer is initialized.

use serde::{Deserialize, Serialize};

/// Leaf kinds of the schema model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    /// Leaf kind of [`Schema::Enum`], carried at runtime as its symbol
    Enum,
    /// Leaf kind of [`Schema::Fixed`], carried at runtime as bytes
    Fixed,
}

impl PrimitiveKind {
    /// Avro type name for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Null => "null",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::String => "string",
            PrimitiveKind::Enum => "enum",
            PrimitiveKind::Fixed => "fixed",
        }
    }

    /// Parse one of the Avro primitive type names
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(PrimitiveKind::Null),
            "boolean" => Some(PrimitiveKind::Boolean),
            "int" => Some(PrimitiveKind::Int),
            "long" => Some(PrimitiveKind::Long),
            "float" => Some(PrimitiveKind::Float),
            "double" => Some(PrimitiveKind::Double),
            "bytes" => Some(PrimitiveKind::Bytes),
            "string" => Some(PrimitiveKind::String),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Recursive schema description
///
/// Records, enums and fixed types are named. `name` is the simple name and
/// `namespace` the namespace it was defined in, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    /// Unnamed leaf; enum and fixed leaves use their own variants
    Primitive {
        kind: PrimitiveKind,
    },
    Record {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        fields: Vec<FieldDef>,
    },
    Enum {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        symbols: Vec<String>,
    },
    Fixed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        size: usize,
    },
    Array {
        items: Box<Schema>,
    },
    /// Members in declaration order
    Union {
        members: Vec<Schema>,
    },
}

impl Schema {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Schema::Primitive { kind }
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn null() -> Self {
        Self::primitive(PrimitiveKind::Null)
    }

    /// Record schema; a dotted name carries its namespace (`org.example.Person`)
    pub fn record(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        let (name, namespace) = split_full_name(name.into());
        Schema::Record {
            name,
            namespace,
            fields,
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (name, namespace) = split_full_name(name.into());
        Schema::Enum {
            name,
            namespace,
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fixed(name: impl Into<String>, size: usize) -> Self {
        let (name, namespace) = split_full_name(name.into());
        Schema::Fixed {
            name,
            namespace,
            size,
        }
    }

    /// Set the namespace of a named schema; other schemas are returned as is
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        if let Schema::Record { namespace, .. }
        | Schema::Enum { namespace, .. }
        | Schema::Fixed { namespace, .. } = &mut self
        {
            *namespace = Some(ns.into()).filter(|ns: &String| !ns.is_empty());
        }
        self
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
        }
    }

    pub fn union(members: Vec<Schema>) -> Self {
        Schema::Union { members }
    }

    /// Nullable shorthand: `["null", inner]`
    pub fn optional(inner: Schema) -> Self {
        Self::union(vec![Self::null(), inner])
    }

    /// Short type name for log and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Primitive { kind } => kind.type_name(),
            Schema::Record { .. } => "record",
            Schema::Enum { .. } => "enum",
            Schema::Fixed { .. } => "fixed",
            Schema::Array { .. } => "array",
            Schema::Union { .. } => "union",
        }
    }
}

/// Namespace-qualified name, `name` alone when there is no namespace
pub fn full_name(name: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}.{}", ns, name),
        _ => name.to_string(),
    }
}

fn split_full_name(name: String) -> (String, Option<String>) {
    match name.rsplit_once('.') {
        Some((ns, simple)) => (simple.to_string(), Some(ns.to_string())),
        None => (name, None),
    }
}

/// A named field of a record schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}
