//! Annotated schema produced by [`DataTypeAnalyzer::finalize`](super::DataTypeAnalyzer::finalize)

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue, json};

use super::aggregate::{AggregateEntry, AggregateTable};
use super::quality::QualityCounters;
use crate::inference::DataTypeCategory;
use crate::schema::{NodeId, NodeKind, PrimitiveKind, SchemaNode, SchemaTree, full_name};

/// Avro property holding a node's aggregate snapshot
pub const DATA_TYPE_AGGREGATE_PROP: &str = "dataTypeAggregate";
/// Avro property holding the root quality counters
pub const GLOBAL_QUALITY_PROP: &str = "globalQuality";

/// Copy of the analyzed schema with every node's counts attached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSchema {
    pub root: AnnotatedNode,
    pub global_quality: QualityCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedNode {
    pub id: NodeId,
    pub data_type_aggregate: Vec<AggregateEntry>,
    #[serde(flatten)]
    pub kind: AnnotatedKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotatedKind {
    Primitive {
        kind: PrimitiveKind,
    },
    Record {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        fields: Vec<AnnotatedField>,
    },
    Enum {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        symbols: Vec<String>,
    },
    Fixed {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        size: usize,
    },
    Array { items: Box<AnnotatedNode> },
    Union { members: Vec<AnnotatedNode> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedField {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub node: AnnotatedNode,
}

impl AnnotatedSchema {
    /// Snapshot every node of `tree`; reads state only
    pub fn build(tree: &SchemaTree, aggregates: &AggregateTable, quality: QualityCounters) -> Self {
        Self {
            root: AnnotatedNode::build(tree.root(), aggregates),
            global_quality: quality,
        }
    }

    /// Field of the root record
    pub fn field(&self, name: &str) -> Option<&AnnotatedNode> {
        self.root.field(name)
    }

    /// Render as Avro schema JSON with `dataTypeAggregate` on every non-null
    /// node and `globalQuality` on the root
    ///
    /// A named type is defined at its first site in pre-order; later sites
    /// refer to it by full name and carry no aggregate of their own.
    pub fn to_avro_json(&self) -> JsonValue {
        let quality = json!(self.global_quality);
        let mut defined = HashSet::new();
        match self.root.to_avro_json(None, &mut defined) {
            JsonValue::Object(mut map) => {
                map.insert(GLOBAL_QUALITY_PROP.to_string(), quality);
                JsonValue::Object(map)
            }
            other => json!({ "type": other, GLOBAL_QUALITY_PROP: quality }),
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_avro_json())
    }
}

impl AnnotatedNode {
    fn build(node: &SchemaNode, aggregates: &AggregateTable) -> Self {
        let kind = match &node.kind {
            NodeKind::Primitive(kind) => AnnotatedKind::Primitive { kind: *kind },
            NodeKind::Record {
                name,
                namespace,
                fields,
            } => AnnotatedKind::Record {
                name: name.clone(),
                namespace: namespace.clone(),
                fields: fields
                    .iter()
                    .map(|f| AnnotatedField {
                        name: f.name.clone(),
                        doc: f.doc.clone(),
                        node: Self::build(&f.node, aggregates),
                    })
                    .collect(),
            },
            NodeKind::Enum {
                name,
                namespace,
                symbols,
            } => AnnotatedKind::Enum {
                name: name.clone(),
                namespace: namespace.clone(),
                symbols: symbols.clone(),
            },
            NodeKind::Fixed {
                name,
                namespace,
                size,
            } => AnnotatedKind::Fixed {
                name: name.clone(),
                namespace: namespace.clone(),
                size: *size,
            },
            NodeKind::Array(items) => AnnotatedKind::Array {
                items: Box::new(Self::build(items, aggregates)),
            },
            NodeKind::Union(members) => AnnotatedKind::Union {
                members: members.iter().map(|m| Self::build(m, aggregates)).collect(),
            },
        };
        Self {
            id: node.id,
            data_type_aggregate: aggregates.snapshot(node.id),
            kind,
        }
    }

    pub fn aggregate(&self) -> &[AggregateEntry] {
        &self.data_type_aggregate
    }

    pub fn field(&self, name: &str) -> Option<&AnnotatedNode> {
        match &self.kind {
            AnnotatedKind::Record { fields, .. } => {
                fields.iter().find(|f| f.name == name).map(|f| &f.node)
            }
            _ => None,
        }
    }

    /// Element node of an array
    pub fn element(&self) -> Option<&AnnotatedNode> {
        match &self.kind {
            AnnotatedKind::Array { items } => Some(items),
            _ => None,
        }
    }

    pub fn members(&self) -> &[AnnotatedNode] {
        match &self.kind {
            AnnotatedKind::Union { members } => members,
            _ => &[],
        }
    }

    /// Leaf kind of a primitive, enum or fixed node
    pub fn leaf_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            AnnotatedKind::Primitive { kind } => Some(kind),
            AnnotatedKind::Enum { .. } => Some(PrimitiveKind::Enum),
            AnnotatedKind::Fixed { .. } => Some(PrimitiveKind::Fixed),
            _ => None,
        }
    }

    /// First union member of the given leaf kind
    pub fn member_of_kind(&self, kind: PrimitiveKind) -> Option<&AnnotatedNode> {
        self.members().iter().find(|m| m.leaf_kind() == Some(kind))
    }

    /// First record member of a union
    pub fn record_member(&self) -> Option<&AnnotatedNode> {
        self.members()
            .iter()
            .find(|m| matches!(m.kind, AnnotatedKind::Record { .. }))
    }

    /// Category with the highest total
    ///
    /// For a union, each category is summed over the node and all of its
    /// members first; ties go to the category seen first. `None` when nothing
    /// was observed.
    pub fn dominant_data_type(&self) -> Option<DataTypeCategory> {
        let mut totals: Vec<(DataTypeCategory, u64)> = Vec::new();
        for entry in self
            .data_type_aggregate
            .iter()
            .chain(self.members().iter().flat_map(|m| m.data_type_aggregate.iter()))
        {
            match totals.iter_mut().find(|(category, _)| *category == entry.data_type) {
                Some((_, total)) => *total += entry.total,
                None => totals.push((entry.data_type, entry.total)),
            }
        }

        let mut best: Option<(DataTypeCategory, u64)> = None;
        for (category, total) in totals {
            if best.is_none_or(|(_, b)| total > b) {
                best = Some((category, total));
            }
        }
        best.map(|(category, _)| category)
    }

    fn to_avro_json(&self, enclosing: Option<&str>, defined: &mut HashSet<String>) -> JsonValue {
        let mut map = Map::new();
        match &self.kind {
            AnnotatedKind::Primitive {
                kind: PrimitiveKind::Null,
            } => return JsonValue::String(PrimitiveKind::Null.type_name().to_string()),
            AnnotatedKind::Primitive { kind } => {
                map.insert("type".into(), json!(kind.type_name()));
            }
            AnnotatedKind::Record {
                name,
                namespace,
                fields,
            } => {
                let namespace = namespace.as_deref();
                if let Some(reference) =
                    named_header(&mut map, "record", name, namespace, enclosing, defined)
                {
                    return reference;
                }
                let fields = fields
                    .iter()
                    .map(|f| {
                        let mut field = Map::new();
                        field.insert("name".into(), json!(f.name));
                        if let Some(doc) = &f.doc {
                            field.insert("doc".into(), json!(doc));
                        }
                        field.insert("type".into(), f.node.to_avro_json(namespace, defined));
                        JsonValue::Object(field)
                    })
                    .collect();
                map.insert("fields".into(), JsonValue::Array(fields));
            }
            AnnotatedKind::Enum {
                name,
                namespace,
                symbols,
            } => {
                let namespace = namespace.as_deref();
                if let Some(reference) =
                    named_header(&mut map, "enum", name, namespace, enclosing, defined)
                {
                    return reference;
                }
                map.insert("symbols".into(), json!(symbols));
            }
            AnnotatedKind::Fixed {
                name,
                namespace,
                size,
            } => {
                let namespace = namespace.as_deref();
                if let Some(reference) =
                    named_header(&mut map, "fixed", name, namespace, enclosing, defined)
                {
                    return reference;
                }
                map.insert("size".into(), json!(size));
            }
            AnnotatedKind::Array { items } => {
                map.insert("type".into(), json!("array"));
                map.insert("items".into(), items.to_avro_json(enclosing, defined));
            }
            AnnotatedKind::Union { members } => {
                return JsonValue::Array(
                    members
                        .iter()
                        .map(|m| m.to_avro_json(enclosing, defined))
                        .collect(),
                );
            }
        }
        map.insert(
            DATA_TYPE_AGGREGATE_PROP.into(),
            json!(self.data_type_aggregate),
        );
        JsonValue::Object(map)
    }
}

/// Write `type`, `name` and, when it differs from the enclosing one,
/// `namespace` for a named type
///
/// Returns the full name instead when the type was already defined.
fn named_header(
    map: &mut Map<String, JsonValue>,
    type_name: &str,
    name: &str,
    namespace: Option<&str>,
    enclosing: Option<&str>,
    defined: &mut HashSet<String>,
) -> Option<JsonValue> {
    let full = full_name(name, namespace);
    if !defined.insert(full.clone()) {
        return Some(JsonValue::String(full));
    }
    map.insert("type".into(), json!(type_name));
    map.insert("name".into(), json!(name));
    if namespace != enclosing {
        map.insert("namespace".into(), json!(namespace.unwrap_or_default()));
    }
    None
}
