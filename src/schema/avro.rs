//! Avro JSON schema loading
//!
//! Converts an Avro schema document into a [`Schema`] description. Named
//! types (records, enums, fixed) are expanded at every reference site, so the
//! resulting description is a plain tree. Recursive named types cannot be
//! expanded into a finite tree and are rejected with
//! [`SchemaError::CyclicReference`].

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use super::error::SchemaError;
use super::types::{FieldDef, PrimitiveKind, Schema, full_name};

impl Schema {
    /// Parse an Avro schema from its JSON text (`.avsc` contents)
    pub fn parse_avro(text: &str) -> Result<Schema, SchemaError> {
        let json: JsonValue = serde_json::from_str(text)?;
        Self::from_avro_json(&json)
    }

    /// Build a schema description from a parsed Avro JSON document
    pub fn from_avro_json(json: &JsonValue) -> Result<Schema, SchemaError> {
        let mut loader = AvroLoader::default();
        loader.collect(json, None, None)?;
        loader.check_references()?;
        loader.expand(json, None)
    }
}

/// A named type definition found while scanning the document
#[derive(Debug)]
struct NamedDef<'a> {
    json: &'a Map<String, JsonValue>,
    namespace: Option<String>,
}

/// Reference from the enclosing named type to another named type, resolved
/// once the whole document has been scanned
#[derive(Debug)]
struct PendingRef {
    owner: String,
    name: String,
    namespace: Option<String>,
}

#[derive(Debug, Default)]
struct AvroLoader<'a> {
    named: HashMap<String, NamedDef<'a>>,
    pending: Vec<PendingRef>,
    graph: Graph<String, (), Directed>,
    node_map: HashMap<String, NodeIndex>,
}

impl<'a> AvroLoader<'a> {
    /// First pass: register named definitions and the references between them
    fn collect(
        &mut self,
        json: &'a JsonValue,
        namespace: Option<&str>,
        owner: Option<&str>,
    ) -> Result<(), SchemaError> {
        match json {
            JsonValue::String(name) => {
                if PrimitiveKind::from_type_name(name).is_none() {
                    self.add_reference(owner, name, namespace);
                }
                Ok(())
            }
            JsonValue::Array(members) => {
                for member in members {
                    self.collect(member, namespace, owner)?;
                }
                Ok(())
            }
            JsonValue::Object(map) => self.collect_object(map, namespace, owner),
            other => Err(SchemaError::InvalidSchema(format!(
                "unexpected schema element: {}",
                other
            ))),
        }
    }

    fn collect_object(
        &mut self,
        map: &'a Map<String, JsonValue>,
        namespace: Option<&str>,
        owner: Option<&str>,
    ) -> Result<(), SchemaError> {
        let type_name = match map.get("type") {
            Some(JsonValue::String(t)) => t.as_str(),
            Some(nested) => return self.collect(nested, namespace, owner),
            None => {
                return Err(SchemaError::InvalidSchema(
                    "schema object without 'type'".to_string(),
                ));
            }
        };

        match type_name {
            "record" | "error" => {
                let (full_name, record_ns) = self.define(map, namespace, owner)?;
                for field in fields_of(map, &full_name)? {
                    let field_type = field_type_of(field, &full_name)?;
                    self.collect(field_type, record_ns.as_deref(), Some(&full_name))?;
                }
                Ok(())
            }
            "enum" | "fixed" => self.define(map, namespace, owner).map(|_| ()),
            "array" => {
                let items = map.get("items").ok_or_else(|| {
                    SchemaError::InvalidSchema("array schema without 'items'".to_string())
                })?;
                self.collect(items, namespace, owner)
            }
            "map" => Err(SchemaError::UnsupportedType("map".to_string())),
            t if PrimitiveKind::from_type_name(t).is_some() => Ok(()),
            reference => {
                self.add_reference(owner, reference, namespace);
                Ok(())
            }
        }
    }

    /// Register a named definition and return its full name and namespace
    fn define(
        &mut self,
        map: &'a Map<String, JsonValue>,
        namespace: Option<&str>,
        owner: Option<&str>,
    ) -> Result<(String, Option<String>), SchemaError> {
        let (name, own_ns) = name_of(map, namespace)?;
        let full_name = full_name(&name, own_ns.as_deref());

        if self.named.contains_key(&full_name) {
            return Err(SchemaError::InvalidSchema(format!(
                "type '{}' is defined more than once",
                full_name
            )));
        }
        self.named.insert(
            full_name.clone(),
            NamedDef {
                json: map,
                namespace: own_ns.clone(),
            },
        );
        self.node(&full_name);
        if let Some(owner) = owner {
            self.edge(owner, &full_name);
        }
        Ok((full_name, own_ns))
    }

    fn add_reference(&mut self, owner: Option<&str>, name: &str, namespace: Option<&str>) {
        self.pending.push(PendingRef {
            owner: owner.unwrap_or_default().to_string(),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        });
    }

    /// Resolve pending references and reject recursive named types
    fn check_references(&mut self) -> Result<(), SchemaError> {
        let pending = std::mem::take(&mut self.pending);
        for reference in &pending {
            let target = self
                .resolve(&reference.name, reference.namespace.as_deref())
                .ok_or_else(|| SchemaError::UnknownType(reference.name.clone()))?;
            if !reference.owner.is_empty() {
                self.edge(&reference.owner, &target);
            }
        }

        toposort(&self.graph, None).map_err(|cycle| {
            SchemaError::CyclicReference(self.graph[cycle.node_id()].clone())
        })?;
        debug!(
            "Resolved {} named types, {} references",
            self.named.len(),
            pending.len()
        );
        Ok(())
    }

    /// Second pass: build the description tree
    fn expand(&self, json: &JsonValue, namespace: Option<&str>) -> Result<Schema, SchemaError> {
        match json {
            JsonValue::String(name) => match PrimitiveKind::from_type_name(name) {
                Some(kind) => Ok(Schema::primitive(kind)),
                None => self.expand_reference(name, namespace),
            },
            JsonValue::Array(members) => members
                .iter()
                .map(|m| self.expand(m, namespace))
                .collect::<Result<Vec<_>, _>>()
                .map(Schema::union),
            JsonValue::Object(map) => self.expand_object(map, namespace),
            other => Err(SchemaError::InvalidSchema(format!(
                "unexpected schema element: {}",
                other
            ))),
        }
    }

    fn expand_object(
        &self,
        map: &Map<String, JsonValue>,
        namespace: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let type_name = match map.get("type") {
            Some(JsonValue::String(t)) => t.as_str(),
            Some(nested) => return self.expand(nested, namespace),
            None => {
                return Err(SchemaError::InvalidSchema(
                    "schema object without 'type'".to_string(),
                ));
            }
        };

        match type_name {
            "record" | "error" => {
                let (name, record_ns) = name_of(map, namespace)?;
                let mut fields = Vec::new();
                for field in fields_of(map, &name)? {
                    let field_name = field
                        .get("name")
                        .and_then(JsonValue::as_str)
                        .ok_or_else(|| {
                            SchemaError::InvalidSchema(format!(
                                "field without 'name' in record '{}'",
                                name
                            ))
                        })?;
                    let schema = self.expand(field_type_of(field, &name)?, record_ns.as_deref())?;
                    let mut def = FieldDef::new(field_name, schema);
                    def.doc = field
                        .get("doc")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string);
                    fields.push(def);
                }
                Ok(Schema::Record {
                    name,
                    namespace: record_ns,
                    fields,
                })
            }
            "enum" => {
                let (name, namespace) = name_of(map, namespace)?;
                let symbols = map
                    .get("symbols")
                    .and_then(JsonValue::as_array)
                    .and_then(|symbols| {
                        symbols
                            .iter()
                            .map(|s| s.as_str().map(str::to_string))
                            .collect::<Option<Vec<_>>>()
                    })
                    .ok_or_else(|| {
                        SchemaError::InvalidSchema(format!(
                            "enum '{}' needs a 'symbols' array of strings",
                            name
                        ))
                    })?;
                Ok(Schema::Enum {
                    name,
                    namespace,
                    symbols,
                })
            }
            "fixed" => {
                let (name, namespace) = name_of(map, namespace)?;
                let size = map
                    .get("size")
                    .and_then(JsonValue::as_u64)
                    .and_then(|size| usize::try_from(size).ok())
                    .ok_or_else(|| {
                        SchemaError::InvalidSchema(format!("fixed '{}' needs a 'size'", name))
                    })?;
                Ok(Schema::Fixed {
                    name,
                    namespace,
                    size,
                })
            }
            "array" => {
                let items = map.get("items").ok_or_else(|| {
                    SchemaError::InvalidSchema("array schema without 'items'".to_string())
                })?;
                Ok(Schema::array(self.expand(items, namespace)?))
            }
            "map" => Err(SchemaError::UnsupportedType("map".to_string())),
            t => match PrimitiveKind::from_type_name(t) {
                Some(kind) => Ok(Schema::primitive(kind)),
                None => self.expand_reference(t, namespace),
            },
        }
    }

    fn expand_reference(&self, name: &str, namespace: Option<&str>) -> Result<Schema, SchemaError> {
        let full_name = self
            .resolve(name, namespace)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?;
        let def = &self.named[&full_name];
        self.expand_object(def.json, def.namespace.as_deref())
    }

    fn resolve(&self, name: &str, namespace: Option<&str>) -> Option<String> {
        let qualified = if name.contains('.') {
            name.to_string()
        } else {
            full_name(name, namespace)
        };
        if self.named.contains_key(&qualified) {
            Some(qualified)
        } else if self.named.contains_key(name) {
            Some(name.to_string())
        } else {
            None
        }
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.node_map.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    fn edge(&mut self, from: &str, to: &str) {
        let from = self.node(from);
        let to = self.node(to);
        self.graph.add_edge(from, to, ());
    }
}

/// Simple name and namespace of a named type
///
/// A dotted name carries its own namespace; otherwise an explicit
/// `namespace` attribute wins over the enclosing one. An empty namespace is
/// the null namespace.
fn name_of(
    map: &Map<String, JsonValue>,
    enclosing: Option<&str>,
) -> Result<(String, Option<String>), SchemaError> {
    let name = map
        .get("name")
        .and_then(JsonValue::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| SchemaError::InvalidSchema("named type without 'name'".to_string()))?;
    let (simple, namespace) = match name.rsplit_once('.') {
        Some((ns, simple)) => (simple, Some(ns)),
        None => (
            name,
            map.get("namespace")
                .and_then(JsonValue::as_str)
                .or(enclosing),
        ),
    };
    Ok((
        simple.to_string(),
        namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
    ))
}

fn fields_of<'a>(
    map: &'a Map<String, JsonValue>,
    record: &str,
) -> Result<impl Iterator<Item = &'a Map<String, JsonValue>>, SchemaError> {
    let fields = map
        .get("fields")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| {
            SchemaError::InvalidSchema(format!("record '{}' has no 'fields' array", record))
        })?;
    if let Some(bad) = fields.iter().find(|f| !f.is_object()) {
        return Err(SchemaError::InvalidSchema(format!(
            "record '{}' has a malformed field: {}",
            record, bad
        )));
    }
    Ok(fields.iter().filter_map(JsonValue::as_object))
}

fn field_type_of<'a>(
    field: &'a Map<String, JsonValue>,
    record: &str,
) -> Result<&'a JsonValue, SchemaError> {
    field.get("type").ok_or_else(|| {
        SchemaError::InvalidSchema(format!(
            "field '{}' in record '{}' has no 'type'",
            field
                .get("name")
                .and_then(JsonValue::as_str)
                .unwrap_or("?"),
            record
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitive_root() {
        let schema = Schema::parse_avro(r#""string""#).unwrap();
        assert_eq!(schema, Schema::string());

        let schema = Schema::parse_avro(r#"{"type": "long", "logicalType": "timestamp-millis"}"#)
            .unwrap();
        assert_eq!(schema, Schema::primitive(PrimitiveKind::Long));
    }

    #[test]
    fn test_parse_record_with_union_and_array() {
        let schema = Schema::parse_avro(
            r#"{
                "type": "record", "name": "Person", "namespace": "org.example",
                "fields": [
                    {"name": "name", "type": "string", "doc": "full name"},
                    {"name": "tags", "type": {"type": "array", "items": "string"}},
                    {"name": "age", "type": ["null", "int"]}
                ]
            }"#,
        )
        .unwrap();

        let Schema::Record {
            name,
            namespace,
            fields,
        } = schema
        else {
            panic!("Expected record");
        };
        assert_eq!(name, "Person");
        assert_eq!(namespace.as_deref(), Some("org.example"));
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].doc.as_deref(), Some("full name"));
        assert_eq!(fields[1].schema, Schema::array(Schema::string()));
        assert_eq!(
            fields[2].schema,
            Schema::optional(Schema::primitive(PrimitiveKind::Int))
        );
    }

    #[test]
    fn test_named_type_reused_by_reference() {
        let schema = Schema::parse_avro(
            r#"{
                "type": "record", "name": "Order", "namespace": "shop",
                "fields": [
                    {"name": "billing", "type": {"type": "record", "name": "Address",
                        "fields": [{"name": "city", "type": "string"}]}},
                    {"name": "shipping", "type": "Address"},
                    {"name": "status", "type": {"type": "enum", "name": "Status", "symbols": ["A", "B"]}},
                    {"name": "previous", "type": ["null", "shop.Status"]}
                ]
            }"#,
        )
        .unwrap();

        let Schema::Record { fields, .. } = schema else {
            panic!("Expected record");
        };
        assert_eq!(fields[0].schema, fields[1].schema);
        assert_eq!(
            fields[0].schema,
            Schema::record("shop.Address", vec![FieldDef::new("city", Schema::string())])
        );
        let status = Schema::enumeration("Status", ["A", "B"]).with_namespace("shop");
        assert_eq!(fields[2].schema, status);
        assert_eq!(fields[3].schema, Schema::optional(status));
    }

    #[test]
    fn test_named_leaves_keep_metadata() {
        let schema = Schema::parse_avro(
            r#"{
                "type": "record", "name": "Msg", "namespace": "net",
                "fields": [
                    {"name": "digest", "type": {"type": "fixed", "name": "Md5", "size": 16}},
                    {"name": "kind", "type": {"type": "enum", "name": "other.Kind", "symbols": ["X"]}},
                    {"name": "plain", "type": {"type": "enum", "name": "Plain", "namespace": "", "symbols": []}}
                ]
            }"#,
        )
        .unwrap();

        let Schema::Record { fields, .. } = schema else {
            panic!("Expected record");
        };
        assert_eq!(fields[0].schema, Schema::fixed("net.Md5", 16));
        assert_eq!(fields[1].schema, Schema::enumeration("other.Kind", ["X"]));
        assert_eq!(
            fields[2].schema,
            Schema::enumeration("Plain", Vec::<String>::new())
        );
    }

    #[test]
    fn test_named_leaves_need_their_attributes() {
        let err = Schema::parse_avro(r#"{"type": "enum", "name": "E"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));

        let err = Schema::parse_avro(r#"{"type": "enum", "name": "E", "symbols": [1]}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));

        let err = Schema::parse_avro(r#"{"type": "fixed", "name": "F"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
    }

    #[test]
    fn test_record_without_name_rejected() {
        let err = Schema::parse_avro(r#"{"type": "record", "fields": []}"#).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidSchema("named type without 'name'".to_string())
        );

        let err = Schema::parse_avro(
            r#"{"type": "record", "name": "R", "fields": [
                {"name": "inner", "type": {"type": "record", "name": "", "fields": []}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
    }

    #[test]
    fn test_recursive_type_rejected() {
        let err = Schema::parse_avro(
            r#"{
                "type": "record", "name": "Node",
                "fields": [
                    {"name": "value", "type": "string"},
                    {"name": "next", "type": ["null", "Node"]}
                ]
            }"#,
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::CyclicReference("Node".to_string()));
    }

    #[test]
    fn test_unknown_reference() {
        let err = Schema::parse_avro(
            r#"{"type": "record", "name": "R", "fields": [{"name": "a", "type": "Missing"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::UnknownType("Missing".to_string()));
    }

    #[test]
    fn test_map_unsupported() {
        let err = Schema::parse_avro(r#"{"type": "map", "values": "string"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Schema::parse_avro("{not json").unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));

        let err = Schema::parse_avro(r#"{"type": "record", "name": "R"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
    }
}
