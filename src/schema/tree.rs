//! Initialized schema tree
//!
//! Each node of a [`SchemaTree`] gets a [`NodeId`] in pre-order when the tree
//! is built. Per-node analysis state lives in tables indexed by that id, so
//! the tree itself stays immutable for the lifetime of an analysis.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::types::{PrimitiveKind, Schema};

/// Stable index of a node within one [`SchemaTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub id: NodeId,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Primitive(PrimitiveKind),
    Record {
        name: String,
        namespace: Option<String>,
        fields: Vec<Field>,
    },
    Enum {
        name: String,
        namespace: Option<String>,
        symbols: Vec<String>,
    },
    Fixed {
        name: String,
        namespace: Option<String>,
        size: usize,
    },
    Array(Box<SchemaNode>),
    Union(Vec<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub doc: Option<String>,
    pub node: SchemaNode,
}

impl SchemaNode {
    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Primitive(PrimitiveKind::Null))
    }

    /// Kind of a leaf node; `None` for records, arrays and unions
    pub fn leaf_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            NodeKind::Primitive(kind) => Some(kind),
            NodeKind::Enum { .. } => Some(PrimitiveKind::Enum),
            NodeKind::Fixed { .. } => Some(PrimitiveKind::Fixed),
            _ => None,
        }
    }

    /// Look up a record field by name
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match &self.kind {
            NodeKind::Record { fields, .. } => {
                fields.iter().find(|f| f.name == name).map(|f| &f.node)
            }
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Primitive(kind) => kind.type_name(),
            NodeKind::Record { .. } => "record",
            NodeKind::Enum { .. } => "enum",
            NodeKind::Fixed { .. } => "fixed",
            NodeKind::Array(_) => "array",
            NodeKind::Union(_) => "union",
        }
    }
}

/// Schema tree with node ids assigned
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTree {
    root: SchemaNode,
    node_count: usize,
}

impl SchemaTree {
    /// Build the tree from a description, rejecting records with duplicate field names
    pub fn build(schema: &Schema) -> Result<Self, SchemaError> {
        let mut next_id = 0;
        let root = build_node(schema, &mut next_id)?;
        Ok(Self {
            root,
            node_count: next_id,
        })
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Number of nodes, which is also one past the largest [`NodeId`]
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}

fn build_node(schema: &Schema, next_id: &mut usize) -> Result<SchemaNode, SchemaError> {
    let id = NodeId(*next_id);
    *next_id += 1;

    let kind = match schema {
        Schema::Primitive {
            kind: kind @ (PrimitiveKind::Enum | PrimitiveKind::Fixed),
        } => {
            return Err(SchemaError::InvalidSchema(format!(
                "{} type needs a name; use Schema::{}",
                kind,
                if *kind == PrimitiveKind::Enum { "enumeration" } else { "fixed" }
            )));
        }
        Schema::Primitive { kind } => NodeKind::Primitive(*kind),
        Schema::Enum {
            name,
            namespace,
            symbols,
        } => NodeKind::Enum {
            name: name.clone(),
            namespace: namespace.clone(),
            symbols: symbols.clone(),
        },
        Schema::Fixed {
            name,
            namespace,
            size,
        } => NodeKind::Fixed {
            name: name.clone(),
            namespace: namespace.clone(),
            size: *size,
        },
        Schema::Record {
            name,
            namespace,
            fields,
        } => {
            let mut seen = HashSet::new();
            let mut built = Vec::with_capacity(fields.len());
            for field in fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        record: name.clone(),
                        field: field.name.clone(),
                    });
                }
                built.push(Field {
                    name: field.name.clone(),
                    doc: field.doc.clone(),
                    node: build_node(&field.schema, next_id)?,
                });
            }
            NodeKind::Record {
                name: name.clone(),
                namespace: namespace.clone(),
                fields: built,
            }
        }
        Schema::Array { items } => NodeKind::Array(Box::new(build_node(items, next_id)?)),
        Schema::Union { members } => NodeKind::Union(
            members
                .iter()
                .map(|m| build_node(m, next_id))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(SchemaNode { id, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    #[test]
    fn test_ids_assigned_in_preorder() {
        let schema = Schema::record(
            "Person",
            vec![
                FieldDef::new("name", Schema::string()),
                FieldDef::new("emails", Schema::array(Schema::string())),
                FieldDef::new("zip", Schema::optional(Schema::string())),
            ],
        );
        let tree = SchemaTree::build(&schema).unwrap();

        // record, name, emails, emails[], zip union, null, string
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.root().id, NodeId(0));
        assert_eq!(tree.root().field("name").unwrap().id, NodeId(1));
        match &tree.root().field("emails").unwrap().kind {
            NodeKind::Array(items) => assert_eq!(items.id, NodeId(3)),
            other => panic!("Expected array, got {:?}", other),
        }
        match &tree.root().field("zip").unwrap().kind {
            NodeKind::Union(members) => {
                assert!(members[0].is_null());
                assert_eq!(members[1].id, NodeId(6));
            }
            other => panic!("Expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = Schema::record(
            "R",
            vec![
                FieldDef::new("a", Schema::string()),
                FieldDef::new("a", Schema::string()),
            ],
        );
        assert_eq!(
            SchemaTree::build(&schema).unwrap_err(),
            SchemaError::DuplicateField {
                record: "R".to_string(),
                field: "a".to_string()
            }
        );
    }

    #[test]
    fn test_union_with_duplicate_kinds_allowed() {
        let schema = Schema::union(vec![Schema::string(), Schema::string(), Schema::null()]);
        let tree = SchemaTree::build(&schema).unwrap();
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_named_leaves() {
        let schema = Schema::record(
            "shop.Order",
            vec![
                FieldDef::new("status", Schema::enumeration("Status", ["OPEN", "CLOSED"])),
                FieldDef::new("hash", Schema::fixed("Md5", 16)),
            ],
        );
        let tree = SchemaTree::build(&schema).unwrap();

        let NodeKind::Record { name, namespace, .. } = &tree.root().kind else {
            panic!("Expected record");
        };
        assert_eq!(name, "Order");
        assert_eq!(namespace.as_deref(), Some("shop"));
        let status = tree.root().field("status").unwrap();
        assert_eq!(status.leaf_kind(), Some(PrimitiveKind::Enum));
        assert_eq!(status.type_name(), "enum");
        assert_eq!(
            tree.root().field("hash").unwrap().leaf_kind(),
            Some(PrimitiveKind::Fixed)
        );
        assert_eq!(tree.root().leaf_kind(), None);
    }

    #[test]
    fn test_unnamed_enum_rejected() {
        let schema = Schema::optional(Schema::primitive(PrimitiveKind::Enum));
        assert!(matches!(
            SchemaTree::build(&schema),
            Err(SchemaError::InvalidSchema(_))
        ));
    }
}
